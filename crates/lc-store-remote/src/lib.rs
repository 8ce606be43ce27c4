//! Remote per-account store for LC Tracker.
//!
//! Talks to the `lc-api` document service over HTTP. Connection failures and
//! timeouts are reported as unavailable so callers can fall back to the local
//! store.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::RemoteStore;
