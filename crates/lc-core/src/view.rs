//! Load tickets for views that fetch data asynchronously.
//!
//! A view takes a ticket before starting a load and hands the result back
//! through it. If the view was torn down, or started a newer load, in the
//! meantime, the ticket is stale and the late result is dropped instead of
//! being applied to state that no longer exists.

use std::sync::{
  Arc,
  atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{record::Snapshot, repository::load_collections, store::RecordStore};

/// Owned by a view for as long as it is mounted.
#[derive(Debug, Clone, Default)]
pub struct ViewHandle {
  generation: Arc<AtomicU64>,
}

/// Permission to apply the result of one load.
#[derive(Debug, Clone)]
pub struct LoadTicket {
  generation: u64,
  current:    Arc<AtomicU64>,
}

impl ViewHandle {
  pub fn new() -> Self { Self::default() }

  /// Start a load. Any ticket handed out earlier becomes stale.
  pub fn begin_load(&self) -> LoadTicket {
    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    LoadTicket { generation, current: Arc::clone(&self.generation) }
  }

  /// The view is going away; every outstanding ticket becomes stale.
  pub fn unmount(&self) { self.generation.fetch_add(1, Ordering::SeqCst); }
}

impl LoadTicket {
  pub fn is_current(&self) -> bool { self.current.load(Ordering::SeqCst) == self.generation }

  /// `Some(value)` if the ticket is still current, otherwise `None`.
  pub fn deliver<T>(&self, value: T) -> Option<T> {
    if self.is_current() {
      Some(value)
    } else {
      debug!(generation = self.generation, "discarding stale load result");
      None
    }
  }
}

/// Load every collection for a view. Returns `Ok(None)` if the view unmounted
/// or reloaded while the reads were in flight.
pub async fn load_for_view<S>(store: &S, ticket: &LoadTicket) -> Result<Option<Snapshot>, S::Error>
where
  S: RecordStore,
{
  let snapshot = load_collections(store).await?;
  Ok(ticket.deliver(snapshot))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    record::RecordId,
    repository::tests::MemStore,
    roster::NewStudent,
    store::RecordStore as _,
  };

  #[test]
  fn newer_load_invalidates_older_ticket() {
    let view = ViewHandle::new();
    let first = view.begin_load();
    let second = view.begin_load();
    assert!(!first.is_current());
    assert!(second.is_current());
    assert_eq!(first.deliver(1), None);
    assert_eq!(second.deliver(2), Some(2));
  }

  #[test]
  fn unmount_invalidates_outstanding_tickets() {
    let view = ViewHandle::new();
    let ticket = view.begin_load();
    view.unmount();
    assert!(!ticket.is_current());
  }

  #[tokio::test]
  async fn load_delivers_while_mounted() {
    let store = MemStore::default();
    store
      .create::<crate::roster::Student>(NewStudent { name: "Avery".into() }, 0)
      .await
      .unwrap();

    let view = ViewHandle::new();
    let ticket = view.begin_load();
    let loaded = load_for_view(&store, &ticket).await.unwrap().unwrap();
    assert_eq!(loaded.students.len(), 1);
    assert_ne!(loaded.students[0].id, RecordId::default());
  }

  #[tokio::test]
  async fn load_after_unmount_is_discarded() {
    let store = MemStore::default();
    let view = ViewHandle::new();
    let ticket = view.begin_load();
    view.unmount();
    assert!(load_for_view(&store, &ticket).await.unwrap().is_none());
  }
}
