//! Finding roster records from what a user typed: an exact id, or a name
//! compared without regard to case.

use lc_core::roster::{Student, Zone};

pub fn student<'a>(students: &'a [Student], key: &str) -> Option<&'a Student> {
  let key = key.trim();
  students
    .iter()
    .find(|s| s.id.as_str() == key)
    .or_else(|| students.iter().find(|s| s.name.trim().eq_ignore_ascii_case(key)))
}

pub fn zone<'a>(zones: &'a [Zone], key: &str) -> Option<&'a Zone> {
  let key = key.trim();
  zones
    .iter()
    .find(|z| z.id.as_str() == key)
    .or_else(|| zones.iter().find(|z| z.name.trim().eq_ignore_ascii_case(key)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn id_wins_over_name() {
    let students = vec![
      Student { id: "jo".into(), name: "Avery".into() },
      Student { id: "s2".into(), name: "jo".into() },
    ];
    assert_eq!(student(&students, "jo").unwrap().name, "Avery");
    assert_eq!(student(&students, " AVERY ").unwrap().id.as_str(), "jo");
    assert!(student(&students, "nobody").is_none());
  }

  #[test]
  fn zones_match_by_name() {
    let zones = vec![Zone { id: "z1".into(), name: "Quiet Room".into(), category: String::new() }];
    assert_eq!(zone(&zones, "quiet room").unwrap().id.as_str(), "z1");
  }
}
