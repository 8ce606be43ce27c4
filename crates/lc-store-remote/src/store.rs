//! [`RemoteStore`]: a [`RecordStore`] over the document service's JSON API.

use std::time::Duration;

use lc_core::{
  record::{Record, RecordId, Snapshot},
  store::RecordStore,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Result};

/// Per-account view of the document service.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct RemoteStore {
  client:   Client,
  base_url: Url,
  account:  String,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl RemoteStore {
  /// A store for `account` on the service at `base_url`.
  pub fn new(base_url: &str, account: &str) -> Result<Self> {
    Self::with_timeout(base_url, account, Duration::from_secs(30))
  }

  pub fn with_timeout(base_url: &str, account: &str, timeout: Duration) -> Result<Self> {
    let base_url =
      Url::parse(base_url).map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
    if base_url.cannot_be_a_base() {
      return Err(Error::InvalidBaseUrl(base_url.to_string()));
    }
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url, account: account.to_string() })
  }

  pub fn account(&self) -> &str { &self.account }

  /// `{base}/accounts/{account}/{segments...}`, with every segment escaped.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| Error::InvalidBaseUrl(self.base_url.to_string()))?
      .pop_if_empty()
      .push("accounts")
      .push(&self.account)
      .extend(segments);
    Ok(url)
  }
}

/// Pass a success response through; turn anything else into
/// [`Error::Status`], keeping the service's error message when it sent one.
async fn check(method: &'static str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let path = resp.url().path().to_string();
  let message = match resp.json::<ErrorBody>().await {
    Ok(body) => body.error,
    Err(_) => status.canonical_reason().unwrap_or("unknown status").to_string(),
  };
  Err(Error::Status { method, path, status: status.as_u16(), message })
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for RemoteStore {
  type Error = Error;

  async fn list<R: Record>(&self) -> Result<Vec<R>> {
    let url = self.url(&[R::COLLECTION.as_ref()])?;
    let resp = self.client.get(url).send().await?;
    let mut records: Vec<R> = check("GET", resp).await?.json().await?;
    records.sort_by(R::listing_order);
    Ok(records)
  }

  /// The service assigns ids itself, so `seq` is not sent.
  async fn create<R: Record>(&self, new: R::New, _seq: usize) -> Result<R> {
    let url = self.url(&[R::COLLECTION.as_ref()])?;
    let resp = self.client.post(url).json(&new).send().await?;
    let record: R = check("POST", resp).await?.json().await?;
    debug!(account = %self.account, collection = %R::COLLECTION, id = %record.id(), "record created");
    Ok(record)
  }

  async fn update<R: Record>(&self, id: RecordId, patch: R::Patch) -> Result<Option<R>> {
    let url = self.url(&[R::COLLECTION.as_ref(), id.as_str()])?;
    let resp = self.client.patch(url).json(&patch).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Ok(Some(check("PATCH", resp).await?.json().await?))
  }

  async fn delete<R: Record>(&self, id: RecordId) -> Result<bool> {
    let url = self.url(&[R::COLLECTION.as_ref(), id.as_str()])?;
    let resp = self.client.delete(url).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(false);
    }
    check("DELETE", resp).await?;
    Ok(true)
  }

  async fn replace_all(&self, snapshot: Snapshot) -> Result<()> {
    let url = self.url(&["snapshot"])?;
    let resp = self.client.put(url).json(&snapshot).send().await?;
    check("PUT", resp).await?;
    debug!(account = %self.account, "snapshot uploaded");
    Ok(())
  }
}
