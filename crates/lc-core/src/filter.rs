//! Filtering and usage aggregation for the Data view.
//!
//! Everything here is a pure function of its inputs and is recomputed on every
//! filter change.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::{
  calendar::Period,
  entry::Entry,
  record::RecordId,
  roster::{BASE_CATEGORIES, UNKNOWN, Zone},
};

// ─── Criteria ────────────────────────────────────────────────────────────────

/// Data view filter. Unset fields match everything.
///
/// The date range only applies when `all_time` is `false`; a missing bound is
/// unbounded on that side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
  pub student_id: Option<RecordId>,
  /// `None` means "All".
  pub day:        Option<Weekday>,
  /// `None` means "All".
  pub period:     Option<Period>,
  pub all_time:   bool,
  pub date_from:  Option<NaiveDate>,
  pub date_to:    Option<NaiveDate>,
}

impl FilterCriteria {
  /// Criteria that keep every entry.
  pub fn everything() -> Self { Self { all_time: true, ..Self::default() } }

  fn date_range_active(&self) -> bool {
    !self.all_time && (self.date_from.is_some() || self.date_to.is_some())
  }

  /// Whether `entry` passes every active condition.
  pub fn matches(&self, entry: &Entry) -> bool {
    if let Some(student_id) = &self.student_id
      && &entry.student_id != student_id
    {
      return false;
    }
    if let Some(period) = self.period
      && entry.period != period.get()
    {
      return false;
    }

    let needs_date = self.day.is_some() || self.date_range_active();
    if !needs_date {
      return true;
    }
    // Entries without a usable date drop out of any date-based filter.
    let Some(date) = entry.calendar_date() else {
      return false;
    };

    if let Some(day) = self.day
      && date.weekday() != day
    {
      return false;
    }
    if self.date_range_active() {
      if self.date_from.is_some_and(|from| date < from) {
        return false;
      }
      if self.date_to.is_some_and(|to| date > to) {
        return false;
      }
    }
    true
  }
}

/// Entries matching `criteria`, in input order.
pub fn filter(entries: &[Entry], criteria: &FilterCriteria) -> Vec<Entry> {
  entries
    .iter()
    .filter(|entry| criteria.matches(entry))
    .cloned()
    .collect()
}

/// Sort newest first: by date descending, then by creation time descending.
/// Entries without a usable date go last.
pub fn sort_newest_first(entries: &mut [Entry]) {
  entries.sort_by(|a, b| {
    b.calendar_date()
      .cmp(&a.calendar_date())
      .then_with(|| b.created_at.cmp(&a.created_at))
  });
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Number of entries logged against one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneUsage {
  pub zone_id: RecordId,
  pub name:    String,
  pub count:   usize,
}

/// Number of entries whose zone falls in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
  pub category: String,
  pub count:    usize,
}

/// One count per zone, in `zones` order, including zones with no entries.
/// Entries that reference an unknown zone (or none) are not counted.
pub fn zone_usage_counts(entries: &[Entry], zones: &[Zone]) -> Vec<ZoneUsage> {
  let mut usage: Vec<ZoneUsage> = zones
    .iter()
    .map(|zone| ZoneUsage { zone_id: zone.id.clone(), name: zone.name.clone(), count: 0 })
    .collect();

  let index: HashMap<&RecordId, usize> = zones
    .iter()
    .enumerate()
    .map(|(i, zone)| (&zone.id, i))
    .collect();

  for entry in entries {
    if let Some(i) = entry.zone_id.as_ref().and_then(|id| index.get(id)) {
      usage[*i].count += 1;
    }
  }
  usage
}

/// Counts per zone category.
///
/// Buckets start with Focus, Semi-Collaborative, Collaborative and Unknown (all
/// present even at zero), followed by any other category used by a zone, in
/// `zones` order. Entries with no zone, an unknown zone, or an uncategorised
/// zone count as Unknown.
pub fn category_usage_counts(entries: &[Entry], zones: &[Zone]) -> Vec<CategoryUsage> {
  let mut buckets: Vec<CategoryUsage> = BASE_CATEGORIES
    .iter()
    .map(|category| CategoryUsage { category: (*category).to_string(), count: 0 })
    .collect();

  for zone in zones {
    let label = zone.category_label();
    if !buckets.iter().any(|b| b.category == label) {
      buckets.push(CategoryUsage { category: label.to_string(), count: 0 });
    }
  }

  let position: HashMap<String, usize> = buckets
    .iter()
    .enumerate()
    .map(|(i, b)| (b.category.clone(), i))
    .collect();
  let zone_category: HashMap<&RecordId, &str> = zones
    .iter()
    .map(|zone| (&zone.id, zone.category_label()))
    .collect();

  for entry in entries {
    let label = entry
      .zone_id
      .as_ref()
      .and_then(|id| zone_category.get(id).copied())
      .unwrap_or(UNKNOWN);
    if let Some(i) = position.get(label) {
      buckets[*i].count += 1;
    }
  }
  buckets
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Everything the Data view shows for one set of criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
  pub entries:    Vec<Entry>,
  pub zones:      Vec<ZoneUsage>,
  pub categories: Vec<CategoryUsage>,
}

/// Filter `entries` and aggregate the result against `zones`.
pub fn summarize(entries: &[Entry], zones: &[Zone], criteria: &FilterCriteria) -> UsageSummary {
  let filtered = filter(entries, criteria);
  let zone_counts = zone_usage_counts(&filtered, zones);
  let categories = category_usage_counts(&filtered, zones);
  UsageSummary { entries: filtered, zones: zone_counts, categories }
}
