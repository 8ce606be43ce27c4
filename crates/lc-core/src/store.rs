//! The `RecordStore` trait, the storage adapter every backend implements.
//!
//! Two backends exist: a local key-value store on the device
//! (`lc-store-sqlite`) and a remote per-account document store
//! (`lc-store-remote`). Callers pick one per session and depend only on this
//! trait.

use std::future::Future;

use crate::record::{Record, RecordId, Snapshot};

/// Error returned by a store backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` if the backing store could not be reached at all, as opposed to a
  /// single operation failing.
  fn is_unavailable(&self) -> bool;
}

/// Abstraction over a backing store for the student, zone and entry
/// collections.
///
/// Each single-record write is atomic. Nothing here is transactional across
/// records; callers issuing several writes must cope with partial success.
///
/// All methods return `Send` futures so stores can be shared across tasks.
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  /// Every record of collection `R`, in [`Record::listing_order`].
  fn list<R: Record>(
    &self,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + '_;

  /// Persist a new record. The store assigns the identifier and creation
  /// timestamp.
  ///
  /// `seq` is the position of this record in the caller's batch; stores that
  /// derive identifiers from the clock fold it into the id so a batch written
  /// within one millisecond stays unique.
  fn create<R: Record>(
    &self,
    new: R::New,
    seq: usize,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Apply a partial update to a record. Returns `None` if no record has that
  /// id. No concurrency check is made; the last write wins.
  fn update<R: Record>(
    &self,
    id: RecordId,
    patch: R::Patch,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` if it did not exist. Nothing cascades:
  /// entries keep referring to removed students and zones.
  fn delete<R: Record>(
    &self,
    id: RecordId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Replace all three collections with the contents of `snapshot`.
  fn replace_all(
    &self,
    snapshot: Snapshot,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
