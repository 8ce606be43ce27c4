//! Encoding helpers between collections and the JSON blobs stored in the `kv`
//! table.
//!
//! Timestamps are stored as RFC 3339 strings. Clock-based ids are
//! `{epoch_ms}-{index}`.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

// ─── Blobs ───────────────────────────────────────────────────────────────────

/// Decode a stored collection; a missing row is an empty collection.
pub fn decode_records<R: DeserializeOwned>(raw: Option<&str>) -> serde_json::Result<Vec<R>> {
  match raw {
    Some(s) if !s.trim().is_empty() => serde_json::from_str(s),
    _ => Ok(Vec::new()),
  }
}

pub fn encode_records<R: Serialize>(records: &[R]) -> serde_json::Result<String> {
  serde_json::to_string(records)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Ids ─────────────────────────────────────────────────────────────────────

pub fn clock_id(created_at: DateTime<Utc>, index: usize) -> String {
  format!("{}-{index}", created_at.timestamp_millis())
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn missing_or_blank_blob_is_empty() {
    assert!(decode_records::<String>(None).unwrap().is_empty());
    assert!(decode_records::<String>(Some("  ")).unwrap().is_empty());
    assert_eq!(decode_records::<String>(Some(r#"["a"]"#)).unwrap(), ["a"]);
  }

  #[test]
  fn clock_id_uses_epoch_millis_and_index() {
    let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    assert_eq!(clock_id(at, 3), "1705276800000-3");
  }
}
