//! Record identifiers, the [`Record`] trait, and import/export envelopes.
//!
//! Students, zones and entries live in three independent collections. Stores
//! handle all three through the same generic operations, so each record type
//! describes its collection, creation input, partial update and listing order
//! here.

use std::{cmp::Ordering, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
  entry::Entry,
  roster::{Student, Zone},
};

// ─── RecordId ────────────────────────────────────────────────────────────────

/// An opaque record identifier. Its shape depends on the store that assigned
/// it (`{epoch_ms}-{index}` locally, a UUID from the document service).
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn is_empty(&self) -> bool { self.0.trim().is_empty() }
}

impl fmt::Display for RecordId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for RecordId {
  fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for RecordId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Collection ──────────────────────────────────────────────────────────────

/// The three persisted collections. The lowercase name is the key used in
/// stores and URLs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
  strum::IntoStaticStr,
  strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Collection {
  Students,
  Zones,
  Entries,
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// Patch type for collections that have no update path. It has no values, so
/// an update can never be constructed for such a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Immutable {}

/// A record stored in one of the three collections.
pub trait Record:
  Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
  const COLLECTION: Collection;

  /// Caller-supplied fields of a record about to be created; the store fills
  /// in the identifier and creation time.
  type New: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

  /// A partial update. Last write wins.
  type Patch: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

  fn id(&self) -> &RecordId;

  fn create(id: RecordId, created_at: DateTime<Utc>, new: Self::New) -> Self;

  fn apply(&mut self, patch: Self::Patch);

  /// Order in which stores return a listing of this collection.
  fn listing_order(a: &Self, b: &Self) -> Ordering;
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// The complete contents of an account: the export/backup payload, and the
/// result of loading every collection at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  pub entries:  Vec<Entry>,
  #[serde(default)]
  pub students: Vec<Student>,
  #[serde(default)]
  pub zones:    Vec<Zone>,
}

impl Snapshot {
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty() && self.students.is_empty() && self.zones.is_empty()
  }
}

/// A parsed import file.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
  /// A full snapshot; replaces all three collections.
  Snapshot(Snapshot),
  /// A bare entry array from an entries-only export; replaces the entries and
  /// keeps the current students and zones.
  Entries(Vec<Entry>),
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn collection_keys_match_their_serde_names() {
    for collection in Collection::iter() {
      let json = serde_json::to_string(&collection).unwrap();
      assert_eq!(json, format!("\"{collection}\""));
      assert_eq!(collection.as_ref(), collection.to_string());
    }
    let key: &'static str = Collection::Students.into();
    assert_eq!(key, "students");
  }
}
