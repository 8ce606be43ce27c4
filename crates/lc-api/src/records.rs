//! Handlers for the per-collection endpoints, generic over the record type.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/accounts/{account}/{collection}` | Listing order of the collection |
//! | `POST`   | `/accounts/{account}/{collection}` | Body: the new-record fields; returns 201 |
//! | `PATCH`  | `/accounts/{account}/{collection}/{id}` | Students and zones only; 404 if missing |
//! | `DELETE` | `/accounts/{account}/{collection}/{id}` | 204, or 404 if missing |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use lc_core::{
  record::{Record, RecordId},
  store::RecordStore,
};

use crate::{AccountStores, error::ApiError, scoped};

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /accounts/{account}/{collection}`
pub async fn list<A, R>(
  State(accounts): State<Arc<A>>,
  Path(account): Path<String>,
) -> Result<Json<Vec<R>>, ApiError>
where
  A: AccountStores,
  R: Record,
{
  let store = scoped(accounts.as_ref(), &account)?;
  let records = store.list::<R>().await.map_err(ApiError::from_store)?;
  Ok(Json(records))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /accounts/{account}/{collection}`
pub async fn create<A, R>(
  State(accounts): State<Arc<A>>,
  Path(account): Path<String>,
  Json(body): Json<R::New>,
) -> Result<impl IntoResponse, ApiError>
where
  A: AccountStores,
  R: Record,
{
  let store = scoped(accounts.as_ref(), &account)?;
  let record = store
    .create::<R>(body, 0)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PATCH /accounts/{account}/{collection}/{id}`
pub async fn update<A, R>(
  State(accounts): State<Arc<A>>,
  Path((account, id)): Path<(String, RecordId)>,
  Json(patch): Json<R::Patch>,
) -> Result<Json<R>, ApiError>
where
  A: AccountStores,
  R: Record,
{
  let store = scoped(accounts.as_ref(), &account)?;
  let record = store
    .update::<R>(id.clone(), patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("{} {id} not found", R::COLLECTION)))?;
  Ok(Json(record))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /accounts/{account}/{collection}/{id}`
pub async fn delete<A, R>(
  State(accounts): State<Arc<A>>,
  Path((account, id)): Path<(String, RecordId)>,
) -> Result<StatusCode, ApiError>
where
  A: AccountStores,
  R: Record,
{
  let store = scoped(accounts.as_ref(), &account)?;
  if store
    .delete::<R>(id.clone())
    .await
    .map_err(ApiError::from_store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("{} {id} not found", R::COLLECTION)))
  }
}
