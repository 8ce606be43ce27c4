//! Local key-value store for LC Tracker, kept in a single SQLite file.
//!
//! Each collection is one JSON blob under a `(namespace, collection)` key, the
//! way a browser's local storage would hold it. Wraps [`tokio_rusqlite`] so all
//! database access runs on a dedicated thread without blocking the async
//! runtime.

mod encode;
mod path;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use path::{expand_tilde, prepare_store_path};
pub use store::{DEFAULT_NAMESPACE, IdScheme, SqliteStore};

#[cfg(test)]
mod tests;
