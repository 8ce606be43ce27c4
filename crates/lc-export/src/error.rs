//! Error types for the lc-export codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("output is not valid UTF-8")]
  Encoding(#[from] std::string::FromUtf8Error),

  #[error("not valid JSON: {0}")]
  Json(#[from] serde_json::Error),

  /// Valid JSON, but neither a snapshot object nor an entry array.
  #[error("expected a snapshot object or an array of entries, found {0}")]
  NotAnExport(&'static str),

  #[error("malformed {collection}: {source}")]
  MalformedRecords {
    collection: &'static str,
    #[source]
    source:     serde_json::Error,
  },
}

impl From<Error> for lc_core::Error {
  /// Anything that went wrong reading an import file is an import format
  /// error; nothing will have been applied.
  fn from(err: Error) -> Self {
    match err {
      Error::Json(_) | Error::NotAnExport(_) | Error::MalformedRecords { .. } => {
        lc_core::Error::ImportFormat(err.to_string())
      }
      other => lc_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
