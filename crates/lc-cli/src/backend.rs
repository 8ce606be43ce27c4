//! The store a session works against, chosen once from the settings: the
//! remote document service when an account is configured, otherwise the local
//! SQLite file.

use anyhow::Context as _;
use lc_core::{
  record::{Record, RecordId, Snapshot},
  store::{RecordStore, StoreError},
  view::{LoadTicket, load_for_view},
};
use lc_store_remote::RemoteStore;
use lc_store_sqlite::{SqliteStore, prepare_store_path};
use thiserror::Error;
use tracing::{info, warn};

use crate::settings::Settings;

// ─── Backend ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BackendError {
  #[error(transparent)]
  Local(#[from] lc_store_sqlite::Error),

  #[error(transparent)]
  Remote(#[from] lc_store_remote::Error),
}

impl StoreError for BackendError {
  fn is_unavailable(&self) -> bool {
    match self {
      BackendError::Local(e) => e.is_unavailable(),
      BackendError::Remote(e) => e.is_unavailable(),
    }
  }
}

#[derive(Clone)]
pub enum Backend {
  Local(SqliteStore),
  Remote(RemoteStore),
}

impl Backend {
  pub fn is_remote(&self) -> bool { matches!(self, Backend::Remote(_)) }
}

impl RecordStore for Backend {
  type Error = BackendError;

  async fn list<R: Record>(&self) -> Result<Vec<R>, BackendError> {
    Ok(match self {
      Backend::Local(s) => s.list::<R>().await?,
      Backend::Remote(s) => s.list::<R>().await?,
    })
  }

  async fn create<R: Record>(&self, new: R::New, seq: usize) -> Result<R, BackendError> {
    Ok(match self {
      Backend::Local(s) => s.create::<R>(new, seq).await?,
      Backend::Remote(s) => s.create::<R>(new, seq).await?,
    })
  }

  async fn update<R: Record>(
    &self,
    id: RecordId,
    patch: R::Patch,
  ) -> Result<Option<R>, BackendError> {
    Ok(match self {
      Backend::Local(s) => s.update::<R>(id, patch).await?,
      Backend::Remote(s) => s.update::<R>(id, patch).await?,
    })
  }

  async fn delete<R: Record>(&self, id: RecordId) -> Result<bool, BackendError> {
    Ok(match self {
      Backend::Local(s) => s.delete::<R>(id).await?,
      Backend::Remote(s) => s.delete::<R>(id).await?,
    })
  }

  async fn replace_all(&self, snapshot: Snapshot) -> Result<(), BackendError> {
    match self {
      Backend::Local(s) => s.replace_all(snapshot).await?,
      Backend::Remote(s) => s.replace_all(snapshot).await?,
    }
    Ok(())
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

pub struct Session {
  pub store: Backend,
  local:     SqliteStore,
}

impl Session {
  pub fn new(store: Backend, local: SqliteStore) -> Self { Self { store, local } }

  /// Open the local store and, if an account is set, the remote one.
  pub async fn open(settings: &Settings) -> anyhow::Result<Self> {
    let path = prepare_store_path(&settings.store_path)
      .with_context(|| format!("failed to prepare {:?}", settings.store_path))?;
    let local = SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?;

    let store = match settings.account() {
      Some(account) => {
        info!(%account, url = %settings.remote_url, "using remote store");
        Backend::Remote(
          RemoteStore::new(&settings.remote_url, account)
            .context("failed to set up the remote store")?,
        )
      }
      None => Backend::Local(local.clone()),
    };
    Ok(Self::new(store, local))
  }

  /// Load everything for a view. When the remote store cannot be reached, the
  /// local store is read instead.
  pub async fn load(&self, ticket: &LoadTicket) -> lc_core::Result<Option<Snapshot>> {
    match load_for_view(&self.store, ticket).await {
      Ok(snapshot) => Ok(snapshot),
      Err(err) if err.is_unavailable() && self.store.is_remote() => {
        warn!(error = %err, "remote store unreachable; showing local data");
        load_for_view(&self.local, ticket)
          .await
          .map_err(lc_core::Error::from_store)
      }
      Err(err) => Err(lc_core::Error::from_store(err)),
    }
  }
}
