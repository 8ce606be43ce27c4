//! The entry form: per-student drafts for one date and period.
//!
//! Drafts are plain values. Every field change goes through
//! [`apply_field_change`], which returns a new draft with the cross-field rules
//! applied, and [`DraftSheet::set_field`] returns a new sheet. Nothing is
//! mutated in place and no input is ever rejected; inconsistent combinations
//! are normalised instead.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
  Error, Result,
  calendar::Period,
  entry::{Action, EntryType, NewEntry},
  record::RecordId,
  roster::Student,
};

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Unsaved form state for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
  pub entry_type:         Option<EntryType>,
  pub zone_id:            Option<RecordId>,
  pub used_study_planner: bool,
  pub action:             Action,
  pub notes:              String,
}

/// A change to a single draft field. `None` clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
  Type(Option<EntryType>),
  Zone(Option<RecordId>),
  UsedStudyPlanner(bool),
  /// Clearing the action resets it to [`Action::SelfDirected`].
  Action(Option<Action>),
  Notes(String),
}

/// Return `draft` with `change` merged in and the dependent fields normalised:
///
/// - any type other than Study clears the study-planner flag;
/// - Enrichment clears the zone;
/// - Absent clears the zone, the study-planner flag and the notes, and resets
///   the action to its default.
pub fn apply_field_change(draft: &Draft, change: FieldChange) -> Draft {
  let mut next = draft.clone();
  match change {
    FieldChange::Type(entry_type) => {
      next.entry_type = entry_type;
      if entry_type != Some(EntryType::Study) {
        next.used_study_planner = false;
      }
      match entry_type {
        Some(EntryType::Enrichment) => next.zone_id = None,
        Some(EntryType::Absent) => {
          next.zone_id = None;
          next.notes.clear();
          next.action = Action::default();
        }
        _ => {}
      }
    }
    FieldChange::Zone(zone_id) => next.zone_id = zone_id.filter(|id| !id.is_empty()),
    FieldChange::UsedStudyPlanner(used) => next.used_study_planner = used,
    FieldChange::Action(action) => next.action = action.unwrap_or_default(),
    FieldChange::Notes(notes) => next.notes = notes,
  }
  next
}

impl Draft {
  /// The entry this draft would produce, or `None` if it is incomplete: no type
  /// chosen, or a Class/Study draft with no zone.
  pub fn to_payload(
    &self,
    student_id: &RecordId,
    date: NaiveDate,
    period: Period,
  ) -> Option<NewEntry> {
    let entry_type = self.entry_type?;
    if entry_type.requires_zone() && self.zone_id.is_none() {
      return None;
    }
    Some(NewEntry::new(
      date,
      period,
      student_id.clone(),
      entry_type,
      self.zone_id.clone(),
      self.used_study_planner,
      self.action,
      self.notes.clone(),
    ))
  }
}

// ─── DraftSheet ──────────────────────────────────────────────────────────────

/// All drafts for the current logging session, keyed by student id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftSheet {
  drafts: HashMap<RecordId, Draft>,
}

impl DraftSheet {
  pub fn new() -> Self { Self::default() }

  pub fn draft(&self, student_id: &RecordId) -> Option<&Draft> { self.drafts.get(student_id) }

  pub fn len(&self) -> usize { self.drafts.len() }

  pub fn is_empty(&self) -> bool { self.drafts.is_empty() }

  /// Apply `change` to one student's draft, creating it if needed. Other
  /// drafts are untouched.
  #[must_use]
  pub fn set_field(mut self, student_id: &RecordId, change: FieldChange) -> Self {
    let current = self.drafts.remove(student_id).unwrap_or_default();
    self
      .drafts
      .insert(student_id.clone(), apply_field_change(&current, change));
    self
  }

  /// Payloads for every complete draft, in `students` order. Drafts for
  /// students not in `students` are ignored.
  pub fn build_submission(
    &self,
    date: NaiveDate,
    period: Period,
    students: &[Student],
  ) -> Vec<NewEntry> {
    students
      .iter()
      .filter_map(|student| {
        self
          .drafts
          .get(&student.id)
          .and_then(|draft| draft.to_payload(&student.id, date, period))
      })
      .collect()
  }

  /// [`Self::build_submission`], failing with [`Error::NoEntries`] if nothing
  /// is ready to save.
  pub fn submit(
    &self,
    date: NaiveDate,
    period: Period,
    students: &[Student],
  ) -> Result<Vec<NewEntry>> {
    let payloads = self.build_submission(date, period, students);
    if payloads.is_empty() {
      return Err(Error::NoEntries);
    }
    Ok(payloads)
  }
}
