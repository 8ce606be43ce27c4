//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use lc_core::{
  record::{Record, RecordId, Snapshot},
  store::{RecordStore, StoreError},
};
use lc_store_sqlite::{IdScheme, SqliteStore};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AccountStores, api_router};

async fn accounts() -> Arc<SqliteStore> {
  let store = SqliteStore::open_in_memory()
    .await
    .unwrap()
    .with_id_scheme(IdScheme::Uuid);
  Arc::new(store)
}

async fn send<A: AccountStores>(
  accounts: Arc<A>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = api_router(accounts)
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();

  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ─── Students & zones ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_list_students() {
  let a = accounts().await;
  let (status, created) = send(
    a.clone(),
    "POST",
    "/accounts/t1/students",
    Some(json!({ "name": "Avery Lee" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["name"], "Avery Lee");
  assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));

  let (status, listed) = send(a, "GET", "/accounts/t1/students", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn accounts_do_not_see_each_other() {
  let a = accounts().await;
  send(a.clone(), "POST", "/accounts/t1/zones", Some(json!({ "name": "Quiet Room" }))).await;

  let (_, other) = send(a, "GET", "/accounts/t2/zones", None).await;
  assert_eq!(other, json!([]));
}

#[tokio::test]
async fn patch_zone_updates_fields() {
  let a = accounts().await;
  let (_, zone) = send(
    a.clone(),
    "POST",
    "/accounts/t1/zones",
    Some(json!({ "name": "Quiet Room", "category": "Focus" })),
  )
  .await;
  let id = zone["id"].as_str().unwrap();

  let (status, updated) = send(
    a,
    "PATCH",
    &format!("/accounts/t1/zones/{id}"),
    Some(json!({ "category": "Collaborative" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Quiet Room");
  assert_eq!(updated["category"], "Collaborative");
}

#[tokio::test]
async fn patch_missing_student_is_404() {
  let a = accounts().await;
  let (status, body) = send(
    a,
    "PATCH",
    "/accounts/t1/students/nope",
    Some(json!({ "name": "x" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn delete_student_twice() {
  let a = accounts().await;
  let (_, student) = send(
    a.clone(),
    "POST",
    "/accounts/t1/students",
    Some(json!({ "name": "Avery" })),
  )
  .await;
  let uri = format!("/accounts/t1/students/{}", student["id"].as_str().unwrap());

  let (first, _) = send(a.clone(), "DELETE", &uri, None).await;
  let (second, _) = send(a, "DELETE", &uri, None).await;
  assert_eq!(first, StatusCode::NO_CONTENT);
  assert_eq!(second, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_account_is_rejected() {
  let a = accounts().await;
  let (status, _) = send(a, "GET", "/accounts/%20/students", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─── Entries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn posted_entry_gets_day_and_normalised_fields() {
  let a = accounts().await;
  let (status, entry) = send(
    a,
    "POST",
    "/accounts/t1/entries",
    Some(json!({
      "date": "2024-01-15",
      "period": 6,
      "student_id": "s1",
      "type": "Enrichment",
      "zone_id": "z1",
      "used_study_planner": true,
      "action": "Conduct 1",
      "notes": "lab",
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(entry["day"], "Monday");
  assert_eq!(entry["type"], "Enrichment");
  assert!(entry.get("zone_id").is_none());
  assert_eq!(entry["used_study_planner"], false);
  assert_eq!(entry["notes"], "lab");
}

#[tokio::test]
async fn entry_with_invalid_period_is_rejected() {
  let a = accounts().await;
  let (status, _) = send(
    a,
    "POST",
    "/accounts/t1/entries",
    Some(json!({
      "date": "2024-01-15",
      "period": 3,
      "student_id": "s1",
      "type": "Absent",
    })),
  )
  .await;
  assert!(status.is_client_error());
}

#[tokio::test]
async fn entries_cannot_be_patched() {
  let a = accounts().await;
  let (status, _) = send(
    a,
    "PATCH",
    "/accounts/t1/entries/e1",
    Some(json!({})),
  )
  .await;
  assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn put_snapshot_replaces_everything() {
  let a = accounts().await;
  send(a.clone(), "POST", "/accounts/t1/students", Some(json!({ "name": "Old" }))).await;

  let snapshot = json!({
    "entries": [],
    "students": [{ "id": "s1", "name": "Avery" }],
    "zones": [{ "id": "z1", "name": "Quiet Room", "category": "" }],
  });
  let (status, _) = send(a.clone(), "PUT", "/accounts/t1/snapshot", Some(snapshot.clone())).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(a, "GET", "/accounts/t1/snapshot", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, snapshot);
}

// ─── Unavailable store ───────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("disk is gone")]
struct Gone;

impl StoreError for Gone {
  fn is_unavailable(&self) -> bool { true }
}

#[derive(Clone)]
struct GoneStore;

impl RecordStore for GoneStore {
  type Error = Gone;

  async fn list<R: Record>(&self) -> Result<Vec<R>, Gone> { Err(Gone) }

  async fn create<R: Record>(&self, _new: R::New, _seq: usize) -> Result<R, Gone> { Err(Gone) }

  async fn update<R: Record>(&self, _id: RecordId, _patch: R::Patch) -> Result<Option<R>, Gone> {
    Err(Gone)
  }

  async fn delete<R: Record>(&self, _id: RecordId) -> Result<bool, Gone> { Err(Gone) }

  async fn replace_all(&self, _snapshot: Snapshot) -> Result<(), Gone> { Err(Gone) }
}

impl AccountStores for GoneStore {
  type Store = GoneStore;

  fn for_account(&self, _account: &str) -> GoneStore { GoneStore }
}

#[tokio::test]
async fn unreachable_store_is_503() {
  let (status, body) = send(Arc::new(GoneStore), "GET", "/accounts/t1/entries", None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(body["error"], "disk is gone");
}

