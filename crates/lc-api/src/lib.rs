//! Per-account document service for LC Tracker.
//!
//! Exposes an axum [`Router`] serving the student, zone and entry collections
//! of each account, backed by any [`AccountStores`]. Authentication is the
//! caller's responsibility; the account id in the path is trusted.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = lc_api::api_router(Arc::new(store.with_id_scheme(IdScheme::Uuid)));
//! ```

pub mod error;
pub mod records;
pub mod snapshot;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch},
};
use lc_core::{
  entry::Entry,
  roster::{Student, Zone},
  store::RecordStore,
};
use lc_store_sqlite::SqliteStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `lc-server.toml` and
/// `LC_SERVER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5380 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.lctrack/server.db") }

// ─── Account scoping ─────────────────────────────────────────────────────────

/// Hands out a store scoped to a single account's collections.
pub trait AccountStores: Send + Sync + 'static {
  type Store: RecordStore;

  fn for_account(&self, account: &str) -> Self::Store;
}

impl AccountStores for SqliteStore {
  type Store = SqliteStore;

  fn for_account(&self, account: &str) -> SqliteStore { self.with_namespace(account) }
}

pub(crate) fn scoped<A: AccountStores>(accounts: &A, account: &str) -> Result<A::Store, ApiError> {
  if account.trim().is_empty() {
    return Err(ApiError::BadRequest("account id must not be blank".into()));
  }
  Ok(accounts.for_account(account))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `accounts`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<A: AccountStores>(accounts: Arc<A>) -> Router<()> {
  Router::new()
    // Students
    .route(
      "/accounts/{account}/students",
      get(records::list::<A, Student>).post(records::create::<A, Student>),
    )
    .route(
      "/accounts/{account}/students/{id}",
      patch(records::update::<A, Student>).delete(records::delete::<A, Student>),
    )
    // Zones
    .route(
      "/accounts/{account}/zones",
      get(records::list::<A, Zone>).post(records::create::<A, Zone>),
    )
    .route(
      "/accounts/{account}/zones/{id}",
      patch(records::update::<A, Zone>).delete(records::delete::<A, Zone>),
    )
    // Entries are append-only apart from deletion.
    .route(
      "/accounts/{account}/entries",
      get(records::list::<A, Entry>).post(records::create::<A, Entry>),
    )
    .route(
      "/accounts/{account}/entries/{id}",
      axum::routing::delete(records::delete::<A, Entry>),
    )
    // Whole-account snapshot
    .route(
      "/accounts/{account}/snapshot",
      get(snapshot::get_all::<A>).put(snapshot::replace::<A>),
    )
    .with_state(accounts)
}

#[cfg(test)]
mod tests;
