//! Error type for `lc-store-remote`.

use lc_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid service url {0:?}")]
  InvalidBaseUrl(String),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The service answered with a non-success status.
  #[error("{method} {path} returned {status}: {message}")]
  Status {
    method:  &'static str,
    path:    String,
    status:  u16,
    message: String,
  },
}

impl StoreError for Error {
  fn is_unavailable(&self) -> bool {
    match self {
      Error::Http(e) => e.is_connect() || e.is_timeout(),
      Error::Status { status, .. } => matches!(status, 502..=504),
      Error::InvalidBaseUrl(_) => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
