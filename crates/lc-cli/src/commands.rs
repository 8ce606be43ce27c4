//! Handlers behind each `lctrack` subcommand.

use std::path::Path;

use anyhow::{Context as _, anyhow};
use lc_core::{
  calendar,
  entry::Entry,
  filter::{self, summarize},
  form::DraftSheet,
  record::{RecordId, Snapshot},
  repository,
  roster::{NewStudent, NewZone, Student, StudentPatch, Zone, ZonePatch},
  store::RecordStore,
  view::ViewHandle,
};
use tracing::info;

use crate::{
  backend::Session,
  cli::{ExportArgs, ExportFormat, FilterArgs, LogArgs, StudentCommand, ZoneCommand},
  lookup, render,
};

/// Load every collection, falling back to local data if need be.
async fn load(session: &Session) -> lc_core::Result<Snapshot> {
  let view = ViewHandle::new();
  let ticket = view.begin_load();
  let snapshot = session.load(&ticket).await?;
  Ok(snapshot.unwrap_or_default())
}

async fn roster(session: &Session) -> lc_core::Result<(Vec<Student>, Vec<Zone>)> {
  let store = &session.store;
  tokio::try_join!(store.list::<Student>(), store.list::<Zone>())
    .map_err(lc_core::Error::from_store)
}

// ─── Manage ──────────────────────────────────────────────────────────────────

pub async fn student(session: &Session, cmd: StudentCommand) -> anyhow::Result<()> {
  let store = &session.store;
  match cmd {
    StudentCommand::List => print!("{}", render::students(&load(session).await?.students)),
    StudentCommand::Add { name } => {
      let student = store
        .create::<Student>(NewStudent { name }, 0)
        .await
        .map_err(lc_core::Error::from_store)?;
      println!("Added {} ({})", student.name, student.id);
    }
    StudentCommand::Rename { student, name } => {
      let id = student_id(session, &student).await?;
      let updated = store
        .update::<Student>(id, StudentPatch { name: Some(name) })
        .await
        .map_err(lc_core::Error::from_store)?
        .ok_or_else(|| anyhow!("student {student:?} no longer exists"))?;
      println!("Renamed to {}", updated.name);
    }
    StudentCommand::Remove { student } => {
      let id = student_id(session, &student).await?;
      if store
        .delete::<Student>(id)
        .await
        .map_err(lc_core::Error::from_store)?
      {
        println!("Removed {student}; their entries are kept.");
      } else {
        println!("{student} was already removed.");
      }
    }
  }
  Ok(())
}

pub async fn zone(session: &Session, cmd: ZoneCommand) -> anyhow::Result<()> {
  let store = &session.store;
  match cmd {
    ZoneCommand::List => print!("{}", render::zones(&load(session).await?.zones)),
    ZoneCommand::Add { name, category } => {
      let zone = store
        .create::<Zone>(NewZone { name, category }, 0)
        .await
        .map_err(lc_core::Error::from_store)?;
      println!("Added {} [{}] ({})", zone.name, zone.category_label(), zone.id);
    }
    ZoneCommand::Update { zone, name, category } => {
      let id = zone_id(session, &zone).await?;
      let updated = store
        .update::<Zone>(id, ZonePatch { name, category })
        .await
        .map_err(lc_core::Error::from_store)?
        .ok_or_else(|| anyhow!("zone {zone:?} no longer exists"))?;
      println!("Updated {} [{}]", updated.name, updated.category_label());
    }
    ZoneCommand::Remove { zone } => {
      let id = zone_id(session, &zone).await?;
      if store
        .delete::<Zone>(id)
        .await
        .map_err(lc_core::Error::from_store)?
      {
        println!("Removed {zone}; entries logged against it are kept.");
      } else {
        println!("{zone} was already removed.");
      }
    }
  }
  Ok(())
}

async fn student_id(session: &Session, key: &str) -> anyhow::Result<RecordId> {
  let (students, _) = roster(session).await?;
  lookup::student(&students, key)
    .map(|s| s.id.clone())
    .ok_or_else(|| anyhow!("no student matches {key:?}"))
}

async fn zone_id(session: &Session, key: &str) -> anyhow::Result<RecordId> {
  let (_, zones) = roster(session).await?;
  lookup::zone(&zones, key)
    .map(|z| z.id.clone())
    .ok_or_else(|| anyhow!("no zone matches {key:?}"))
}

// ─── Log ─────────────────────────────────────────────────────────────────────

pub async fn log(session: &Session, args: LogArgs) -> anyhow::Result<()> {
  let (students, zones) = roster(session).await?;

  let mut sheet = DraftSheet::new();
  for mark in &args.marks {
    let (student_id, changes) = mark.resolve(&students, &zones)?;
    for change in changes {
      sheet = sheet.set_field(&student_id, change);
    }
  }

  let date = args.date.unwrap_or_else(calendar::today);
  let outcome =
    repository::submit_drafts(&session.store, &sheet, date, args.period, &students).await?;

  if outcome.is_partial() {
    println!(
      "Saved {} of {} entries for {date} period {}; the rest could not be stored.",
      outcome.saved, outcome.submitted, args.period
    );
  } else {
    println!("Saved {} entries for {date} period {}.", outcome.saved, args.period);
  }
  Ok(())
}

// ─── Data, export & import ───────────────────────────────────────────────────

pub async fn data(session: &Session, filters: FilterArgs) -> anyhow::Result<()> {
  let snapshot = load(session).await?;
  let criteria = filters.criteria(&snapshot.students)?;

  let mut summary = summarize(&snapshot.entries, &snapshot.zones, &criteria);
  filter::sort_newest_first(&mut summary.entries);
  print!("{}", render::data_view(&summary, &snapshot.students, &snapshot.zones));
  Ok(())
}

pub async fn export(session: &Session, args: ExportArgs) -> anyhow::Result<()> {
  let snapshot = load(session).await?;
  let text = match args.format {
    ExportFormat::Csv => {
      let criteria = args.filters.criteria(&snapshot.students)?;
      let mut entries: Vec<Entry> = filter::filter(&snapshot.entries, &criteria);
      filter::sort_newest_first(&mut entries);
      lc_export::to_csv(&entries, &snapshot.students, &snapshot.zones)?
    }
    ExportFormat::Json => {
      lc_export::to_snapshot_json(&snapshot.entries, &snapshot.students, &snapshot.zones)?
    }
  };

  match &args.out {
    Some(path) => {
      std::fs::write(path, &text).with_context(|| format!("failed to write {path:?}"))?;
      info!(path = %path.display(), "export written");
    }
    None => print!("{text}"),
  }
  Ok(())
}

pub async fn import(session: &Session, path: &Path) -> anyhow::Result<()> {
  let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?;
  let payload = lc_export::parse_import(&text).map_err(lc_core::Error::from)?;
  let applied = repository::import(&session.store, payload).await?;
  println!(
    "Imported {} entries, {} students and {} zones.",
    applied.entries.len(),
    applied.students.len(),
    applied.zones.len()
  );
  Ok(())
}
