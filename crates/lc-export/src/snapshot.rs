//! JSON snapshot export and import parsing.

use lc_core::{
  entry::Entry,
  record::{ImportPayload, Snapshot},
  roster::{Student, Zone},
};
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Borrowed view of a snapshot, so exporting does not copy the collections.
#[derive(Serialize)]
struct SnapshotRef<'a> {
  entries:  &'a [Entry],
  students: &'a [Student],
  zones:    &'a [Zone],
}

/// Render all three collections as a pretty-printed snapshot object.
pub fn to_snapshot_json(entries: &[Entry], students: &[Student], zones: &[Zone]) -> Result<String> {
  Ok(serde_json::to_string_pretty(&SnapshotRef { entries, students, zones })?)
}

/// Parse an uploaded file.
///
/// Accepts a snapshot object (any of `entries`, `students`, `zones`; missing
/// keys are empty collections) or a bare array of entries. Everything else is
/// rejected, and a malformed record rejects the whole file.
pub fn parse_import(input: &str) -> Result<ImportPayload> {
  let value: Value = serde_json::from_str(input)?;
  match value {
    array @ Value::Array(_) => Ok(ImportPayload::Entries(records(array, "entries")?)),
    Value::Object(mut map) => {
      if !["entries", "students", "zones"].iter().any(|k| map.contains_key(*k)) {
        return Err(Error::NotAnExport("an object without entries, students or zones"));
      }
      let mut take = |key: &str| map.remove(key).unwrap_or(Value::Array(Vec::new()));
      Ok(ImportPayload::Snapshot(Snapshot {
        entries:  records(take("entries"), "entries")?,
        students: records(take("students"), "students")?,
        zones:    records(take("zones"), "zones")?,
      }))
    }
    Value::Null => Err(Error::NotAnExport("null")),
    Value::Bool(_) => Err(Error::NotAnExport("a boolean")),
    Value::Number(_) => Err(Error::NotAnExport("a number")),
    Value::String(_) => Err(Error::NotAnExport("a string")),
  }
}

fn records<T: serde::de::DeserializeOwned>(value: Value, collection: &'static str) -> Result<Vec<T>> {
  if !value.is_array() {
    return Err(Error::NotAnExport("a collection that is not an array"));
  }
  serde_json::from_value(value).map_err(|source| Error::MalformedRecords { collection, source })
}
