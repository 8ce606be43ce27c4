//! Export and import formats for LC Tracker.
//!
//! Renders entries as CSV for spreadsheets, and the whole data set as a JSON
//! snapshot that can be imported again. Pure synchronous; no database or HTTP
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use lc_export::{parse_import, to_csv, to_snapshot_json};
//! # use lc_core::{entry::Entry, roster::{Student, Zone}};
//! # let (entries, students, zones): (Vec<Entry>, Vec<Student>, Vec<Zone>) = Default::default();
//!
//! let csv = to_csv(&entries, &students, &zones).unwrap();
//! let json = to_snapshot_json(&entries, &students, &zones).unwrap();
//! let payload = parse_import(&json).unwrap();
//! ```

pub mod error;
mod snapshot;
mod table;

pub use error::{Error, Result};
pub use snapshot::{parse_import, to_snapshot_json};
pub use table::{CSV_HEADER, to_csv};
