//! Command-line surface of `lctrack`.

use std::{path::PathBuf, str::FromStr};

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use lc_core::{
  calendar::{self, Period},
  filter::FilterCriteria,
  record::RecordId,
  roster::Student,
};

use crate::{lookup, marks::Mark};

// ─── Top level ───────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lctrack", version, about = "Log and report classroom LC observations")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "lctrack.toml")]
  pub config: PathBuf,

  /// Account id; selects the remote document service for this session.
  #[arg(long, global = true)]
  pub account: Option<String>,

  /// Base URL of the document service.
  #[arg(long, global = true, value_name = "URL")]
  pub remote_url: Option<String>,

  /// Path of the local store.
  #[arg(long, global = true, value_name = "FILE")]
  pub store: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage the student roster.
  #[command(subcommand)]
  Student(StudentCommand),

  /// Manage classroom zones.
  #[command(subcommand)]
  Zone(ZoneCommand),

  /// Record observations for one date and period.
  Log(LogArgs),

  /// Show filtered entries and usage counts.
  Data(FilterArgs),

  /// Export entries as CSV or everything as a JSON snapshot.
  Export(ExportArgs),

  /// Replace all stored data with the contents of an export file.
  Import {
    file: PathBuf,
  },
}

// ─── Manage ──────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
  List,
  Add {
    name: String,
  },
  /// Rename a student, given by id or name.
  Rename {
    student: String,
    name:    String,
  },
  /// Remove a student. Their entries are kept.
  Remove {
    student: String,
  },
}

#[derive(Subcommand, Debug)]
pub enum ZoneCommand {
  List,
  Add {
    name:     String,
    /// Focus, Semi-Collaborative, Collaborative, or any other label.
    #[arg(long, default_value = "")]
    category: String,
  },
  /// Change a zone's name or category, given by id or name.
  Update {
    zone:     String,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long)]
    category: Option<String>,
  },
  Remove {
    zone: String,
  },
}

// ─── Log ─────────────────────────────────────────────────────────────────────

#[derive(ClapArgs, Debug)]
pub struct LogArgs {
  /// Date of the observations; defaults to today.
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub date:   Option<NaiveDate>,

  /// Class period, 4 to 8.
  #[arg(long)]
  pub period: Period,

  /// `STUDENT:field=value[,field=value...]` with fields `type`, `zone`,
  /// `planner`, `action` and `notes`. `notes` must come last and takes the
  /// rest of the argument.
  #[arg(long = "mark", value_name = "SPEC", required = true)]
  pub marks:  Vec<Mark>,
}

// ─── Data & export ───────────────────────────────────────────────────────────

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FilterArgs {
  /// Student id or name.
  #[arg(long)]
  pub student:  Option<String>,

  /// Weekday name, or `All`.
  #[arg(long)]
  pub day:      Option<String>,

  /// Period 4 to 8, or `All`.
  #[arg(long)]
  pub period:   Option<String>,

  /// Earliest date to include.
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub from:     Option<NaiveDate>,

  /// Latest date to include.
  #[arg(long, value_name = "YYYY-MM-DD")]
  pub to:       Option<NaiveDate>,

  /// Ignore `--from` and `--to`.
  #[arg(long)]
  pub all_time: bool,
}

impl FilterArgs {
  /// Resolve the flags into criteria. A student that is not on the roster is
  /// taken as a raw id, so entries of removed students can still be found.
  pub fn criteria(&self, students: &[Student]) -> lc_core::Result<FilterCriteria> {
    let student_id = self.student.as_deref().map(|key| {
      lookup::student(students, key)
        .map(|s| s.id.clone())
        .unwrap_or_else(|| RecordId::from(key))
    });

    let day = match self.day.as_deref() {
      Some(d) if !is_all(d) => Some(calendar::parse_weekday(d)?),
      _ => None,
    };
    let period = match self.period.as_deref() {
      Some(p) if !is_all(p) => Some(Period::from_str(p)?),
      _ => None,
    };

    let ranged = self.from.is_some() || self.to.is_some();
    Ok(FilterCriteria {
      student_id,
      day,
      period,
      all_time: self.all_time || !ranged,
      date_from: self.from,
      date_to: self.to,
    })
  }
}

fn is_all(s: &str) -> bool { s.trim().eq_ignore_ascii_case("all") }

#[derive(ClapArgs, Debug)]
pub struct ExportArgs {
  pub format:  ExportFormat,

  /// Write here instead of standard output.
  #[arg(long, short)]
  pub out:     Option<PathBuf>,

  /// Filters for CSV export; a JSON snapshot always holds everything.
  #[command(flatten)]
  pub filters: FilterArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Csv,
  Json,
}
