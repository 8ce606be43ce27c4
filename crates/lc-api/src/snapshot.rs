//! Handlers for `/accounts/{account}/snapshot`.
//!
//! `GET` returns all three collections at once; `PUT` replaces them (restore
//! from a backup).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use lc_core::{record::Snapshot, repository, store::RecordStore};
use tracing::info;

use crate::{AccountStores, error::ApiError, scoped};

/// `GET /accounts/{account}/snapshot`
pub async fn get_all<A: AccountStores>(
  State(accounts): State<Arc<A>>,
  Path(account): Path<String>,
) -> Result<Json<Snapshot>, ApiError> {
  let store = scoped(accounts.as_ref(), &account)?;
  let snapshot = repository::load_collections(&store)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(snapshot))
}

/// `PUT /accounts/{account}/snapshot` with a full snapshot as the body.
pub async fn replace<A: AccountStores>(
  State(accounts): State<Arc<A>>,
  Path(account): Path<String>,
  Json(snapshot): Json<Snapshot>,
) -> Result<StatusCode, ApiError> {
  let store = scoped(accounts.as_ref(), &account)?;
  let counts = (snapshot.entries.len(), snapshot.students.len(), snapshot.zones.len());
  store
    .replace_all(snapshot)
    .await
    .map_err(ApiError::from_store)?;
  info!(
    %account,
    entries = counts.0,
    students = counts.1,
    zones = counts.2,
    "account snapshot replaced"
  );
  Ok(StatusCode::NO_CONTENT)
}
