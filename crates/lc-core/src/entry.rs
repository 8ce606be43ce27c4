//! Entries: one logged observation of a student in a given period.
//!
//! Entries are append-only: they are created from a submitted form, listed,
//! filtered and exported, and never edited.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;

use crate::{
  Error, Result,
  calendar::{self, Period},
  record::{Collection, Immutable, Record, RecordId},
};

// ─── EntryType ───────────────────────────────────────────────────────────────

/// What the student was doing during the period.
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
  strum::EnumString,
  strum::AsRefStr,
  strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EntryType {
  Class,
  Study,
  Enrichment,
  Absent,
}

impl EntryType {
  /// Parse a type name, ignoring case and surrounding whitespace.
  pub fn parse_label(s: &str) -> Result<Self> {
    s.trim()
      .parse()
      .map_err(|_| Error::UnknownEntryType(s.to_string()))
  }

  /// Class and Study entries must name the zone the student worked in;
  /// Enrichment and Absent entries never carry one.
  pub fn requires_zone(self) -> bool { matches!(self, Self::Class | Self::Study) }
}

// ─── Action ──────────────────────────────────────────────────────────────────

/// How the student's behaviour was handled during the period.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
  strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Action {
  #[default]
  #[serde(rename = "Self-Directed")]
  #[strum(serialize = "Self-Directed")]
  SelfDirected,
  Coached,
  Redirected,
  #[serde(rename = "Conduct 1")]
  #[strum(serialize = "Conduct 1")]
  Conduct1,
  #[serde(rename = "Conduct 2")]
  #[strum(serialize = "Conduct 2")]
  Conduct2,
  #[serde(rename = "Conduct 3")]
  #[strum(serialize = "Conduct 3")]
  Conduct3,
  #[serde(rename = "Need Attention")]
  #[strum(serialize = "Need Attention")]
  NeedAttention,
}

impl Action {
  /// Parse an action label, ignoring case and treating `-`, `_` and spaces
  /// alike (`self-directed`, `conduct_2`, `need attention`).
  pub fn parse_label(s: &str) -> Result<Self> {
    if let Ok(action) = s.trim().parse::<Self>() {
      return Ok(action);
    }
    let norm = |v: &str| -> String {
      v.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
    };
    let wanted = norm(s);
    Self::iter()
      .find(|a| norm(a.as_ref()) == wanted)
      .ok_or_else(|| Error::UnknownAction(s.to_string()))
  }
}

// ─── Entry ───────────────────────────────────────────────────────────────────

/// A stored observation.
///
/// `date` and `day` are kept as the strings that were stored: entries restored
/// from older backups may carry a date that no longer parses, and such entries
/// must survive a round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
  pub id:                 RecordId,
  #[serde(default)]
  pub date:               String,
  #[serde(default)]
  pub day:                String,
  pub period:             u8,
  pub student_id:         RecordId,
  #[serde(rename = "type")]
  pub entry_type:         EntryType,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "empty_id_as_none"
  )]
  pub zone_id:            Option<RecordId>,
  #[serde(default)]
  pub used_study_planner: bool,
  #[serde(default)]
  pub action:             Action,
  #[serde(default)]
  pub notes:              String,
  pub created_at:         DateTime<Utc>,
}

impl Entry {
  /// The parsed calendar date, or `None` if the stored value is missing or
  /// malformed.
  pub fn calendar_date(&self) -> Option<NaiveDate> { calendar::parse_date(&self.date) }

  /// The weekday to show for this entry. Derived from `date` whenever it
  /// parses; the stored `day` is only used for entries with an unusable date.
  pub fn weekday_label(&self) -> String {
    self
      .calendar_date()
      .map(calendar::weekday_name)
      .unwrap_or_else(|| self.day.clone())
  }
}

/// Stores often hold `""` for "no zone"; treat it like an absent field.
fn empty_id_as_none<'de, D>(de: D) -> std::result::Result<Option<RecordId>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<RecordId>::deserialize(de)?;
  Ok(raw.filter(|id| !id.is_empty()))
}

// ─── NewEntry ────────────────────────────────────────────────────────────────

/// A validated entry payload produced by a form submission.
///
/// Construct with [`NewEntry::new`], which normalises the fields that depend on
/// the entry type. The weekday is never stored here; it is derived from `date`
/// when the entry is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
  pub date:               NaiveDate,
  pub period:             Period,
  pub student_id:         RecordId,
  #[serde(rename = "type")]
  pub entry_type:         EntryType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub zone_id:            Option<RecordId>,
  #[serde(default)]
  pub used_study_planner: bool,
  #[serde(default)]
  pub action:             Action,
  #[serde(default)]
  pub notes:              String,
}

impl NewEntry {
  /// Build a payload, dropping whatever the entry type does not allow: the zone
  /// for Enrichment/Absent, the study-planner flag for anything but Study, and
  /// the notes and action for Absent.
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    date: NaiveDate,
    period: Period,
    student_id: RecordId,
    entry_type: EntryType,
    zone_id: Option<RecordId>,
    used_study_planner: bool,
    action: Action,
    notes: String,
  ) -> Self {
    Self {
      date,
      period,
      student_id,
      entry_type,
      zone_id: zone_id.filter(|id| entry_type.requires_zone() && !id.is_empty()),
      used_study_planner: entry_type == EntryType::Study && used_study_planner,
      action: if entry_type == EntryType::Absent { Action::default() } else { action },
      notes: if entry_type == EntryType::Absent { String::new() } else { notes },
    }
  }

  /// Re-apply the type rules of [`NewEntry::new`]; payloads that arrive
  /// deserialised have not been through the constructor.
  pub fn normalized(self) -> Self {
    Self::new(
      self.date,
      self.period,
      self.student_id,
      self.entry_type,
      self.zone_id,
      self.used_study_planner,
      self.action,
      self.notes,
    )
  }

  /// The weekday name for this payload's date.
  pub fn day(&self) -> String { calendar::weekday_name(self.date) }
}

impl Record for Entry {
  const COLLECTION: Collection = Collection::Entries;
  type New = NewEntry;
  type Patch = Immutable;

  fn id(&self) -> &RecordId { &self.id }

  fn create(id: RecordId, created_at: DateTime<Utc>, new: NewEntry) -> Self {
    let new = new.normalized();
    Self {
      id,
      date: calendar::format_date(new.date),
      day: new.day(),
      period: new.period.get(),
      student_id: new.student_id,
      entry_type: new.entry_type,
      zone_id: new.zone_id,
      used_study_planner: new.used_study_planner,
      action: new.action,
      notes: new.notes,
      created_at,
    }
  }

  fn apply(&mut self, patch: Immutable) { match patch {} }

  fn listing_order(a: &Self, b: &Self) -> Ordering {
    a.created_at
      .cmp(&b.created_at)
      .then_with(|| a.id.cmp(&b.id))
  }
}
