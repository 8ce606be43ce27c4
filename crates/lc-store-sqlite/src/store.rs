//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::{
  path::Path,
  sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, Utc};
use lc_core::{
  record::{Collection, Record, RecordId, Snapshot},
  store::RecordStore,
};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Result,
  encode::{clock_id, decode_records, encode_dt, encode_records},
  schema::SCHEMA,
};

/// Namespace used on a device with no signed-in account.
pub const DEFAULT_NAMESPACE: &str = "local";

/// How new record identifiers are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdScheme {
  /// `{epoch_ms}-{index}` from the creation timestamp and batch position.
  #[default]
  Clock,
  /// Random UUIDs, as a document service would assign them.
  Uuid,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A key-value store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and clock are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:      tokio_rusqlite::Connection,
  namespace: Arc<str>,
  ids:       IdScheme,
  /// Last creation timestamp handed out, shared by all clones.
  clock:     Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      namespace: Arc::from(DEFAULT_NAMESPACE),
      ids: IdScheme::default(),
      clock: Arc::new(Mutex::new(None)),
    })
  }

  /// A handle onto the same database that reads and writes `namespace`.
  pub fn with_namespace(&self, namespace: &str) -> Self {
    Self { namespace: Arc::from(namespace), ..self.clone() }
  }

  pub fn with_id_scheme(self, ids: IdScheme) -> Self { Self { ids, ..self } }

  pub fn namespace(&self) -> &str { &self.namespace }

  /// The next creation timestamp: the current time, bumped forward if needed
  /// so timestamps strictly increase across this store's writes. Clock ids are
  /// therefore unique even for writes within the same millisecond.
  fn next_timestamp(&self) -> DateTime<Utc> {
    let now = Utc::now();
    let mut last = self.clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let next = match *last {
      Some(prev) if now <= prev => prev + Duration::milliseconds(1),
      _ => now,
    };
    *last = Some(next);
    next
  }

  fn new_id(&self, created_at: DateTime<Utc>, seq: usize) -> RecordId {
    match self.ids {
      IdScheme::Clock => RecordId::new(clock_id(created_at, seq)),
      IdScheme::Uuid => RecordId::new(Uuid::new_v4().hyphenated().to_string()),
    }
  }

  /// Read-modify-write one collection inside a single transaction.
  async fn modify<R, T, F>(&self, f: F) -> Result<T>
  where
    R: Record,
    T: Send + 'static,
    F: FnOnce(&mut Vec<R>) -> T + Send + 'static,
  {
    let namespace  = self.namespace.to_string();
    let key: &'static str = R::COLLECTION.into();
    let updated_at = encode_dt(Utc::now());

    let out = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw: Option<String> = tx
          .query_row(
            "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
            rusqlite::params![namespace, key],
            |row| row.get(0),
          )
          .optional()?;

        let mut records: Vec<R> = decode_records(raw.as_deref()).map_err(other)?;
        let out = f(&mut records);
        let blob = encode_records(&records).map_err(other)?;

        put(&tx, &namespace, key, &blob, &updated_at)?;
        tx.commit()?;
        Ok(out)
      })
      .await?;
    Ok(out)
  }
}

fn other(err: serde_json::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(err))
}

fn put(
  conn: &rusqlite::Connection,
  namespace: &str,
  key: &str,
  blob: &str,
  updated_at: &str,
) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO kv (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT (namespace, key) DO UPDATE
     SET value = excluded.value, updated_at = excluded.updated_at",
    rusqlite::params![namespace, key, blob, updated_at],
  )?;
  Ok(())
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn list<R: Record>(&self) -> Result<Vec<R>> {
    let namespace = self.namespace.to_string();
    let key: &'static str = R::COLLECTION.into();

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
              rusqlite::params![namespace, key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let mut records: Vec<R> = decode_records(raw.as_deref())?;
    records.sort_by(R::listing_order);
    Ok(records)
  }

  async fn create<R: Record>(&self, new: R::New, seq: usize) -> Result<R> {
    let created_at = self.next_timestamp();
    let record     = R::create(self.new_id(created_at, seq), created_at, new);

    let stored = record.clone();
    self
      .modify::<R, _, _>(move |records| records.push(stored))
      .await?;

    debug!(
      namespace = %self.namespace,
      collection = %R::COLLECTION,
      id = %record.id(),
      "record created"
    );
    Ok(record)
  }

  async fn update<R: Record>(&self, id: RecordId, patch: R::Patch) -> Result<Option<R>> {
    let updated = self
      .modify::<R, _, _>(move |records| {
        records.iter_mut().find(|r| r.id() == &id).map(|r| {
          r.apply(patch);
          r.clone()
        })
      })
      .await?;

    if let Some(record) = &updated {
      debug!(collection = %R::COLLECTION, id = %record.id(), "record updated");
    }
    Ok(updated)
  }

  async fn delete<R: Record>(&self, id: RecordId) -> Result<bool> {
    let removed = self
      .modify::<R, _, _>(move |records| {
        let before = records.len();
        records.retain(|r| r.id() != &id);
        records.len() != before
      })
      .await?;

    debug!(collection = %R::COLLECTION, removed, "record delete");
    Ok(removed)
  }

  async fn replace_all(&self, snapshot: Snapshot) -> Result<()> {
    let namespace  = self.namespace.to_string();
    let updated_at = encode_dt(Utc::now());
    let blobs: [(&'static str, String); 3] = [
      (Collection::Entries.into(), encode_records(&snapshot.entries)?),
      (Collection::Students.into(), encode_records(&snapshot.students)?),
      (Collection::Zones.into(), encode_records(&snapshot.zones)?),
    ];

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (key, blob) in &blobs {
          put(&tx, &namespace, key, blob, &updated_at)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(namespace = %self.namespace, "all collections replaced");
    Ok(())
  }
}
