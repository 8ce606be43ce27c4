//! Students and zones, the two managed reference collections.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{Collection, Record, RecordId};

// ─── Categories ──────────────────────────────────────────────────────────────

pub const FOCUS: &str = "Focus";
pub const SEMI_COLLABORATIVE: &str = "Semi-Collaborative";
pub const COLLABORATIVE: &str = "Collaborative";
pub const UNKNOWN: &str = "Unknown";

/// Category buckets every usage chart starts with, in display order.
pub const BASE_CATEGORIES: [&str; 4] = [FOCUS, SEMI_COLLABORATIVE, COLLABORATIVE, UNKNOWN];

// ─── Student ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:   RecordId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
  pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
  #[serde(default)]
  pub name: Option<String>,
}

impl Record for Student {
  const COLLECTION: Collection = Collection::Students;
  type New = NewStudent;
  type Patch = StudentPatch;

  fn id(&self) -> &RecordId { &self.id }

  fn create(id: RecordId, _created_at: DateTime<Utc>, new: NewStudent) -> Self {
    Self { id, name: new.name }
  }

  fn apply(&mut self, patch: StudentPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering { by_name(&a.name, &b.name) }
}

// ─── Zone ────────────────────────────────────────────────────────────────────

/// A named area of the classroom. `category` is free text; the empty string
/// means uncategorised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
  pub id:       RecordId,
  pub name:     String,
  #[serde(default)]
  pub category: String,
}

impl Zone {
  /// The category bucket this zone counts towards.
  pub fn category_label(&self) -> &str {
    let category = self.category.trim();
    if category.is_empty() { UNKNOWN } else { category }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewZone {
  pub name:     String,
  #[serde(default)]
  pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePatch {
  #[serde(default)]
  pub name:     Option<String>,
  #[serde(default)]
  pub category: Option<String>,
}

impl Record for Zone {
  const COLLECTION: Collection = Collection::Zones;
  type New = NewZone;
  type Patch = ZonePatch;

  fn id(&self) -> &RecordId { &self.id }

  fn create(id: RecordId, _created_at: DateTime<Utc>, new: NewZone) -> Self {
    Self { id, name: new.name, category: new.category }
  }

  fn apply(&mut self, patch: ZonePatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
  }

  fn listing_order(a: &Self, b: &Self) -> Ordering { by_name(&a.name, &b.name) }
}

/// Case-insensitive name order, falling back to exact comparison so the
/// ordering is total.
fn by_name(a: &str, b: &str) -> Ordering {
  a.to_lowercase()
    .cmp(&b.to_lowercase())
    .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn zone(category: &str) -> Zone {
    Zone { id: "z1".into(), name: "Quiet Corner".into(), category: category.into() }
  }

  #[test]
  fn empty_category_counts_as_unknown() {
    assert_eq!(zone("").category_label(), UNKNOWN);
    assert_eq!(zone("  ").category_label(), UNKNOWN);
    assert_eq!(zone(FOCUS).category_label(), FOCUS);
    assert_eq!(zone("Outdoor").category_label(), "Outdoor");
  }

  #[test]
  fn zone_patch_only_touches_supplied_fields() {
    let mut z = zone(FOCUS);
    z.apply(ZonePatch { name: None, category: Some(COLLABORATIVE.into()) });
    assert_eq!(z.name, "Quiet Corner");
    assert_eq!(z.category, COLLABORATIVE);
  }

  #[test]
  fn students_list_by_name_ignoring_case() {
    let mut students = vec![
      Student { id: "1".into(), name: "charlie".into() },
      Student { id: "2".into(), name: "Alice".into() },
      Student { id: "3".into(), name: "bob".into() },
    ];
    students.sort_by(Student::listing_order);
    let names: Vec<_> = students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Alice", "bob", "charlie"]);
  }

  #[test]
  fn zone_without_category_field_deserialises() {
    let z: Zone = serde_json::from_str(r#"{"id":"z9","name":"Lab"}"#).unwrap();
    assert_eq!(z.category, "");
  }
}
