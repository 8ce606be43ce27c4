//! Plain-text rendering for terminal output.

use std::{collections::HashMap, fmt::Write as _};

use lc_core::{
  entry::{Entry, EntryType},
  filter::UsageSummary,
  record::RecordId,
  roster::{Student, Zone},
};

/// Left-aligned columns separated by two spaces.
fn table(header: &[&str], rows: &[Vec<String>]) -> String {
  let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
  for row in rows {
    for (w, cell) in widths.iter_mut().zip(row) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let mut line = |cells: &mut dyn Iterator<Item = &str>| {
    let text: Vec<String> = cells
      .zip(&widths)
      .map(|(cell, w)| format!("{cell:<w$}"))
      .collect();
    let _ = writeln!(out, "{}", text.join("  ").trim_end());
  };
  line(&mut header.iter().copied());
  for row in rows {
    line(&mut row.iter().map(String::as_str));
  }
  out
}

pub fn students(students: &[Student]) -> String {
  if students.is_empty() {
    return "No students yet.\n".to_string();
  }
  let rows: Vec<_> = students
    .iter()
    .map(|s| vec![s.name.clone(), s.id.to_string()])
    .collect();
  table(&["Name", "Id"], &rows)
}

pub fn zones(zones: &[Zone]) -> String {
  if zones.is_empty() {
    return "No zones yet.\n".to_string();
  }
  let rows: Vec<_> = zones
    .iter()
    .map(|z| vec![z.name.clone(), z.category_label().to_string(), z.id.to_string()])
    .collect();
  table(&["Name", "Category", "Id"], &rows)
}

/// The Data view: entries in the order given, then both usage breakdowns.
pub fn data_view(summary: &UsageSummary, students: &[Student], zones: &[Zone]) -> String {
  let student_names: HashMap<&RecordId, &str> =
    students.iter().map(|s| (&s.id, s.name.as_str())).collect();
  let zone_names: HashMap<&RecordId, &str> =
    zones.iter().map(|z| (&z.id, z.name.as_str())).collect();

  let mut out = String::new();
  if summary.entries.is_empty() {
    out.push_str("No entries match.\n");
  } else {
    let rows: Vec<_> = summary
      .entries
      .iter()
      .map(|e| entry_row(e, &student_names, &zone_names))
      .collect();
    out.push_str(&table(
      &["Date", "Day", "Period", "Student", "Type", "Zone", "Planner", "Action", "Notes"],
      &rows,
    ));
  }

  out.push_str("\nZone usage\n");
  let rows: Vec<_> = summary
    .zones
    .iter()
    .map(|z| vec![z.name.clone(), z.count.to_string()])
    .collect();
  out.push_str(&table(&["Zone", "Entries"], &rows));

  out.push_str("\nCategory usage\n");
  let rows: Vec<_> = summary
    .categories
    .iter()
    .map(|c| vec![c.category.clone(), c.count.to_string()])
    .collect();
  out.push_str(&table(&["Category", "Entries"], &rows));
  out
}

fn entry_row(
  e: &Entry,
  students: &HashMap<&RecordId, &str>,
  zones: &HashMap<&RecordId, &str>,
) -> Vec<String> {
  let student = students
    .get(&e.student_id)
    .copied()
    .unwrap_or(e.student_id.as_str());
  let zone = e
    .zone_id
    .as_ref()
    .map(|id| zones.get(id).copied().unwrap_or(id.as_str()))
    .unwrap_or("");
  let planner = match (e.entry_type, e.used_study_planner) {
    (EntryType::Study, true) => "Yes",
    (EntryType::Study, false) => "No",
    _ => "",
  };
  vec![
    e.date.clone(),
    e.weekday_label(),
    e.period.to_string(),
    student.to_string(),
    e.entry_type.to_string(),
    zone.to_string(),
    planner.to_string(),
    e.action.to_string(),
    e.notes.replace(['\r', '\n'], " "),
  ]
}
