use thiserror::Error;

/// Broad classification used by the fail-soft logging path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// The request could not complete (connect, timeout, body read)
  Network,
  /// The catalog answered, but not with a usable payload
  Api,
}

/// Errors raised by the catalog client
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("catalog request failed: {0}")]
  Network(#[from] reqwest::Error),

  #[error("catalog returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed catalog payload: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("invalid catalog url: {0}")]
  Url(#[from] url::ParseError),
}

impl CatalogError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      CatalogError::Network(_) => ErrorKind::Network,
      CatalogError::Status { .. } | CatalogError::Malformed(_) | CatalogError::Url(_) => {
        ErrorKind::Api
      }
    }
  }
}
