//! Dates, weekdays and class periods.
//!
//! Weekday names are always derived from the calendar date of an entry, never
//! from the wall clock at the time the entry was recorded.

use std::{fmt, str::FromStr};

use chrono::{Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Storage format for entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The full English name of the weekday `date` falls on.
pub fn weekday_name(date: NaiveDate) -> String { date.format("%A").to_string() }

/// Parse a stored `YYYY-MM-DD` date. Returns `None` for anything else.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Like [`parse_date`], but an error for user-supplied input.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate> {
  parse_date(s).ok_or_else(|| Error::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Today's date on the local clock; the default for new entries.
pub fn today() -> NaiveDate { Local::now().date_naive() }

/// Parse a weekday name (`Monday`, `mon`, `FRIDAY`), case-insensitively.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
  s.trim()
    .parse()
    .map_err(|_| Error::UnknownWeekday(s.to_string()))
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// A class period in which observations are logged.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Period(u8);

impl Period {
  /// Every period the tracker knows about, in timetable order.
  pub const ALL: [Period; 5] = [Period(4), Period(5), Period(6), Period(7), Period(8)];

  pub fn new(n: u8) -> Option<Self> { (4..=8).contains(&n).then_some(Self(n)) }

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Period {
  type Error = Error;

  fn try_from(n: u8) -> Result<Self> {
    Self::new(n).ok_or_else(|| Error::InvalidPeriod(n.to_string()))
  }
}

impl From<Period> for u8 {
  fn from(p: Period) -> u8 { p.0 }
}

impl FromStr for Period {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    s.trim()
      .parse::<u8>()
      .ok()
      .and_then(Self::new)
      .ok_or_else(|| Error::InvalidPeriod(s.trim().to_string()))
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  #[test]
  fn weekday_comes_from_the_date() {
    assert_eq!(weekday_name(d("2024-01-15")), "Monday");
    assert_eq!(weekday_name(d("2024-01-16")), "Tuesday");
    assert_eq!(weekday_name(d("2024-02-29")), "Thursday");
    assert_eq!(weekday_name(d("2023-12-31")), "Sunday");
  }

  #[test]
  fn parse_date_rejects_other_formats() {
    assert!(parse_date("01/15/2024").is_none());
    assert!(parse_date("").is_none());
    assert!(parse_date("2024-13-01").is_none());
    assert_eq!(parse_date(" 2024-01-15 "), Some(d("2024-01-15")));
  }

  #[test]
  fn parse_weekday_is_case_insensitive() {
    assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
    assert_eq!(parse_weekday("FRIDAY").unwrap(), Weekday::Fri);
    assert_eq!(parse_weekday(" Wed ").unwrap(), Weekday::Wed);
    assert!(parse_weekday("Funday").is_err());
  }

  #[test]
  fn periods_are_limited_to_four_through_eight() {
    assert!(Period::new(3).is_none());
    assert!(Period::new(9).is_none());
    assert_eq!(Period::new(6).map(Period::get), Some(6));
    assert_eq!("7".parse::<Period>().unwrap().get(), 7);
    assert!("12".parse::<Period>().is_err());
    assert_eq!(Period::ALL.len(), 5);
  }

  #[test]
  fn unparseable_period_keeps_the_input() {
    let err = "abc".parse::<Period>().unwrap_err();
    assert!(matches!(&err, Error::InvalidPeriod(raw) if raw == "abc"));
    assert!(err.to_string().contains("\"abc\""));

    let err = Period::try_from(9).unwrap_err();
    assert!(matches!(&err, Error::InvalidPeriod(raw) if raw == "9"));
  }
}
