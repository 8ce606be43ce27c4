//! Store-level operations built on [`RecordStore`]: saving a submission,
//! loading every collection, and applying an import.

use chrono::NaiveDate;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  calendar::Period,
  entry::{Entry, NewEntry},
  form::DraftSheet,
  record::{ImportPayload, Snapshot},
  roster::{Student, Zone},
  store::{RecordStore, StoreError as _},
};

/// Persist `payloads` as independent writes, issued concurrently.
///
/// Returns how many were saved. A failed write does not undo the others and is
/// not retried. Fails with [`Error::StorageUnavailable`] only when nothing was
/// saved and the store reported itself unreachable.
pub async fn append_entries<S>(store: &S, payloads: Vec<NewEntry>) -> Result<usize>
where
  S: RecordStore + Clone + 'static,
{
  let total = payloads.len();
  let mut writes = JoinSet::new();
  for (index, payload) in payloads.into_iter().enumerate() {
    let store = store.clone();
    writes.spawn(async move { store.create::<Entry>(payload, index).await });
  }

  let mut saved = 0;
  let mut unreachable = None;
  while let Some(joined) = writes.join_next().await {
    match joined {
      Ok(Ok(entry)) => {
        debug!(id = %entry.id, student = %entry.student_id, "entry saved");
        saved += 1;
      }
      Ok(Err(err)) => {
        warn!(error = %err, "entry write failed");
        if err.is_unavailable() && unreachable.is_none() {
          unreachable = Some(err.to_string());
        }
      }
      Err(err) => warn!(error = %err, "entry write task failed"),
    }
  }

  if saved == 0
    && let Some(reason) = unreachable
  {
    return Err(Error::StorageUnavailable(reason));
  }
  if saved < total {
    warn!(saved, total, "submission partially saved");
  }
  Ok(saved)
}

/// Outcome of a submission: how many entries were built from the drafts and
/// how many of them reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
  pub submitted: usize,
  pub saved:     usize,
}

impl Submission {
  pub fn is_partial(&self) -> bool { self.saved < self.submitted }
}

/// Validate the drafts in `sheet` and save them. Fails with
/// [`Error::NoEntries`] before touching the store if no draft is complete.
pub async fn submit_drafts<S>(
  store: &S,
  sheet: &DraftSheet,
  date: NaiveDate,
  period: Period,
  students: &[Student],
) -> Result<Submission>
where
  S: RecordStore + Clone + 'static,
{
  let payloads = sheet.submit(date, period, students)?;
  let submitted = payloads.len();
  let saved = append_entries(store, payloads).await?;
  info!(saved, submitted, %date, %period, "submission recorded");
  Ok(Submission { submitted, saved })
}

/// Load students, zones and entries, with the three reads in flight together.
pub async fn load_collections<S>(store: &S) -> Result<Snapshot, S::Error>
where
  S: RecordStore,
{
  let (students, zones, entries) = tokio::try_join!(
    store.list::<Student>(),
    store.list::<Zone>(),
    store.list::<Entry>(),
  )?;
  Ok(Snapshot { entries, students, zones })
}

/// Apply an import. The result replaces what is stored; nothing is merged.
///
/// A bare entry array replaces the entries and keeps the current students and
/// zones.
pub async fn import<S>(store: &S, payload: ImportPayload) -> Result<Snapshot>
where
  S: RecordStore,
{
  let snapshot = match payload {
    ImportPayload::Snapshot(snapshot) => snapshot,
    ImportPayload::Entries(entries) => {
      let current = load_collections(store).await.map_err(Error::from_store)?;
      Snapshot { entries, ..current }
    }
  };

  store
    .replace_all(snapshot.clone())
    .await
    .map_err(Error::from_store)?;
  info!(
    entries = snapshot.entries.len(),
    students = snapshot.students.len(),
    zones = snapshot.zones.len(),
    "import applied"
  );
  Ok(snapshot)
}
