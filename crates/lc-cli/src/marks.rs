//! `--mark` arguments of `lctrack log`.
//!
//! A mark names a student and lists field changes for their draft:
//!
//! ```text
//! Avery:type=Study,zone=Quiet Room,planner=yes,action=coached,notes=essay, part 2
//! ```
//!
//! Changes apply in order. `notes` takes everything after `notes=`, commas
//! included, so it must come last. Student and zone references are resolved
//! against the roster once it has been loaded.

use std::str::FromStr;

use lc_core::{
  entry::{Action, EntryType},
  form::FieldChange,
  record::RecordId,
  roster::{Student, Zone},
};
use thiserror::Error;

use crate::lookup;

#[derive(Debug, Error)]
pub enum MarkError {
  #[error("expected STUDENT:field=value, got {0:?}")]
  Shape(String),

  #[error("unknown field {0:?}; expected type, zone, planner, action or notes")]
  UnknownField(String),

  #[error("planner must be yes or no, got {0:?}")]
  Planner(String),

  #[error("no student matches {0:?}")]
  UnknownStudent(String),

  #[error("no zone matches {0:?}")]
  UnknownZone(String),

  #[error(transparent)]
  Value(#[from] lc_core::Error),
}

/// A parsed, not yet resolved, `--mark`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
  /// Student id or name as typed.
  pub student: String,
  /// Changes in order; a zone carries the id or name as typed.
  pub changes: Vec<FieldChange>,
}

impl FromStr for Mark {
  type Err = MarkError;

  fn from_str(s: &str) -> Result<Self, MarkError> {
    let (student, mut rest) = s.split_once(':').ok_or_else(|| MarkError::Shape(s.to_string()))?;
    if student.trim().is_empty() || rest.trim().is_empty() {
      return Err(MarkError::Shape(s.to_string()));
    }

    let mut changes = Vec::new();
    loop {
      let (field, after) = rest.split_once('=').ok_or_else(|| MarkError::Shape(s.to_string()))?;
      let field = field.trim().to_ascii_lowercase();
      if field == "notes" {
        changes.push(FieldChange::Notes(after.to_string()));
        break;
      }

      let (value, next) = match after.split_once(',') {
        Some((value, next)) => (value.trim(), Some(next)),
        None => (after.trim(), None),
      };
      changes.push(parse_change(&field, value)?);

      match next {
        Some(next) => rest = next,
        None => break,
      }
    }

    Ok(Mark { student: student.trim().to_string(), changes })
  }
}

fn parse_change(field: &str, value: &str) -> Result<FieldChange, MarkError> {
  let cleared = value.is_empty() || value.eq_ignore_ascii_case("none");
  Ok(match field {
    "type" => FieldChange::Type(if cleared { None } else { Some(EntryType::parse_label(value)?) }),
    "zone" => FieldChange::Zone((!cleared).then(|| RecordId::from(value))),
    "action" => FieldChange::Action(if cleared { None } else { Some(Action::parse_label(value)?) }),
    "planner" => FieldChange::UsedStudyPlanner(match value.to_ascii_lowercase().as_str() {
      "yes" | "y" | "true" => true,
      "no" | "n" | "false" => false,
      _ => return Err(MarkError::Planner(value.to_string())),
    }),
    other => return Err(MarkError::UnknownField(other.to_string())),
  })
}

impl Mark {
  /// Resolve the student and any zone references to ids on the roster.
  pub fn resolve(
    &self,
    students: &[Student],
    zones: &[Zone],
  ) -> Result<(RecordId, Vec<FieldChange>), MarkError> {
    let student = lookup::student(students, &self.student)
      .ok_or_else(|| MarkError::UnknownStudent(self.student.clone()))?;

    let changes = self
      .changes
      .iter()
      .cloned()
      .map(|change| match change {
        FieldChange::Zone(Some(key)) => lookup::zone(zones, key.as_str())
          .map(|z| FieldChange::Zone(Some(z.id.clone())))
          .ok_or_else(|| MarkError::UnknownZone(key.to_string())),
        other => Ok(other),
      })
      .collect::<Result<_, _>>()?;

    Ok((student.id.clone(), changes))
  }
}
