//! CSV rendering of a (filtered) entry list.
//!
//! Every field is quoted. Student and zone ids are resolved to names where
//! possible; a reference to a removed record falls back to the raw id.

use std::collections::HashMap;

use chrono::SecondsFormat;
use lc_core::{
  entry::{Entry, EntryType},
  record::RecordId,
  roster::{Student, UNKNOWN, Zone},
};

use crate::Result;

/// Column names of the CSV export, in order.
pub const CSV_HEADER: [&str; 11] = [
  "Date",
  "Day",
  "Period",
  "Student",
  "Type",
  "Zone",
  "Zone Category",
  "Used Study Planner",
  "Action",
  "Notes",
  "Timestamp",
];

/// Render `entries` as CSV, one row per entry in input order.
pub fn to_csv(entries: &[Entry], students: &[Student], zones: &[Zone]) -> Result<String> {
  let student_names: HashMap<&RecordId, &str> = students
    .iter()
    .map(|s| (&s.id, s.name.as_str()))
    .collect();
  let zones_by_id: HashMap<&RecordId, &Zone> = zones.iter().map(|z| (&z.id, z)).collect();

  let mut writer = csv::WriterBuilder::new()
    .quote_style(csv::QuoteStyle::Always)
    .terminator(csv::Terminator::Any(b'\n'))
    .from_writer(Vec::new());

  writer.write_record(CSV_HEADER)?;

  for entry in entries {
    let student = student_names
      .get(&entry.student_id)
      .copied()
      .unwrap_or(entry.student_id.as_str());

    let (zone, category) = match &entry.zone_id {
      None => ("", ""),
      Some(id) => match zones_by_id.get(id) {
        Some(z) => (z.name.as_str(), z.category_label()),
        None => (id.as_str(), UNKNOWN),
      },
    };

    let planner = match (entry.entry_type, entry.used_study_planner) {
      (EntryType::Study, true) => "Yes",
      (EntryType::Study, false) => "No",
      _ => "N/A",
    };

    let day = entry.weekday_label();
    let period = entry.period.to_string();
    let notes = single_line(&entry.notes);
    let timestamp = entry
      .created_at
      .to_rfc3339_opts(SecondsFormat::Millis, true);

    writer.write_record([
      entry.date.as_str(),
      day.as_str(),
      period.as_str(),
      student,
      entry.entry_type.as_ref(),
      zone,
      category,
      planner,
      entry.action.as_ref(),
      notes.as_str(),
      timestamp.as_str(),
    ])?;
  }

  let bytes = writer.into_inner().map_err(|e| e.into_error())?;
  Ok(String::from_utf8(bytes)?)
}

/// Collapse line breaks to single spaces so each entry stays on one row.
fn single_line(s: &str) -> String { s.replace("\r\n", " ").replace(['\r', '\n'], " ") }

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use lc_core::{
    entry::Action,
    filter::{FilterCriteria, filter},
    record::ImportPayload,
  };

  use super::*;

  fn entry(id: &str, entry_type: EntryType, zone: Option<&str>) -> Entry {
    Entry {
      id: id.into(),
      date: "2024-01-15".into(),
      day: "Monday".into(),
      period: 5,
      student_id: "s1".into(),
      entry_type,
      zone_id: zone.map(RecordId::from),
      used_study_planner: true,
      action: Action::Conduct2,
      notes: String::new(),
      created_at: Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap(),
    }
  }

  fn roster() -> (Vec<Student>, Vec<Zone>) {
    (
      vec![Student { id: "s1".into(), name: "Avery Lee".into() }],
      vec![Zone { id: "z1".into(), name: "Quiet Room".into(), category: "Focus".into() }],
    )
  }

  fn parse(csv_text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
      .has_headers(false)
      .from_reader(csv_text.as_bytes())
      .records()
      .map(|r| r.unwrap().iter().map(str::to_string).collect())
      .collect()
  }

  #[test]
  fn two_entries_give_header_plus_two_rows() {
    let (students, zones) = roster();
    let entries = vec![entry("1", EntryType::Class, Some("z1")), entry("2", EntryType::Absent, None)];

    let rows = parse(&to_csv(&entries, &students, &zones).unwrap());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], CSV_HEADER);
  }

  #[test]
  fn every_field_is_quoted() {
    let (students, zones) = roster();
    let out = to_csv(&[entry("1", EntryType::Class, Some("z1"))], &students, &zones).unwrap();
    let mut lines = out.lines();
    assert!(lines.next().unwrap().starts_with("\"Date\",\"Day\",\"Period\""));
    assert_eq!(
      lines.next().unwrap(),
      "\"2024-01-15\",\"Monday\",\"5\",\"Avery Lee\",\"Class\",\"Quiet Room\",\"Focus\",\
       \"N/A\",\"Conduct 2\",\"\",\"2024-01-15T14:30:00.000Z\""
    );
  }

  #[test]
  fn study_planner_column_depends_on_type() {
    let (students, zones) = roster();
    let mut unused = entry("2", EntryType::Study, Some("z1"));
    unused.used_study_planner = false;
    let entries = vec![
      entry("1", EntryType::Study, Some("z1")),
      unused,
      entry("3", EntryType::Enrichment, None),
    ];

    let rows = parse(&to_csv(&entries, &students, &zones).unwrap());
    let planner: Vec<_> = rows[1..].iter().map(|r| r[7].as_str()).collect();
    assert_eq!(planner, ["Yes", "No", "N/A"]);
  }

  #[test]
  fn unresolved_references_fall_back_to_ids() {
    let mut e = entry("1", EntryType::Class, Some("z-gone"));
    e.student_id = "s-gone".into();

    let rows = parse(&to_csv(&[e], &[], &[]).unwrap());
    assert_eq!(rows[1][3], "s-gone");
    assert_eq!(rows[1][5], "z-gone");
    assert_eq!(rows[1][6], UNKNOWN);
  }

  #[test]
  fn notes_are_flattened_and_quotes_doubled() {
    let (students, zones) = roster();
    let mut e = entry("1", EntryType::Class, Some("z1"));
    e.notes = "said \"done\"\nthen left\r\nearly".into();

    let out = to_csv(&[e], &students, &zones).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("\"said \"\"done\"\" then left early\""));
  }

  #[test]
  fn day_column_is_derived_from_the_date() {
    let payload = crate::parse_import(
      r#"[{
        "id": "e1",
        "date": "2024-01-15",
        "day": "Tuesday",
        "period": 4,
        "student_id": "s1",
        "type": "Absent",
        "created_at": "2024-01-16T08:00:00Z"
      }]"#,
    )
    .unwrap();
    let ImportPayload::Entries(entries) = payload else { panic!("expected an entry array") };

    let criteria = FilterCriteria {
      day: Some(chrono::Weekday::Mon),
      ..FilterCriteria::everything()
    };
    let kept = filter(&entries, &criteria);
    assert_eq!(kept.len(), 1);

    let rows = parse(&to_csv(&kept, &[], &[]).unwrap());
    assert_eq!(rows[1][1], "Monday");
  }

  #[test]
  fn rows_keep_input_order() {
    let (students, zones) = roster();
    let mut later = entry("b", EntryType::Class, Some("z1"));
    later.date = "2024-02-01".into();
    let entries = vec![later, entry("a", EntryType::Class, Some("z1"))];

    let rows = parse(&to_csv(&entries, &students, &zones).unwrap());
    assert_eq!(rows[1][0], "2024-02-01");
    assert_eq!(rows[2][0], "2024-01-15");
  }
}
