//! Error types for `lc-core`.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
  /// A submission produced no valid entries.
  #[error("no entries logged")]
  NoEntries,

  /// The backing store could not be reached at all.
  #[error("storage unavailable: {0}")]
  StorageUnavailable(String),

  /// An uploaded file is neither a snapshot object nor an entry array.
  #[error("unrecognised import file: {0}")]
  ImportFormat(String),

  #[error("invalid period {0:?}: expected one of 4, 5, 6, 7, 8")]
  InvalidPeriod(String),

  #[error("unknown entry type: {0:?}")]
  UnknownEntryType(String),

  #[error("unknown action: {0:?}")]
  UnknownAction(String),

  #[error("unknown weekday: {0:?}")]
  UnknownWeekday(String),

  #[error("invalid date {0:?}: expected YYYY-MM-DD")]
  InvalidDate(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Classify a backend error, promoting connectivity failures to
  /// [`Error::StorageUnavailable`].
  pub fn from_store<E: StoreError>(err: E) -> Self {
    if err.is_unavailable() {
      Self::StorageUnavailable(err.to_string())
    } else {
      Self::Store(Box::new(err))
    }
  }

  /// The message shown to the user for this failure. None of these are fatal;
  /// the session stays usable after any of them.
  pub fn user_message(&self) -> String {
    match self {
      Self::NoEntries => "No entries logged. Choose a type (and a zone for Class or \
                          Study) for at least one student."
        .to_string(),
      Self::StorageUnavailable(_) => "Could not reach storage, nothing was saved. Try \
                                      again or switch to local-only mode."
        .to_string(),
      Self::ImportFormat(_) => {
        "That file is not a recognised LC Tracker export. Nothing was imported.".to_string()
      }
      other => format!("Something went wrong: {other}"),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
