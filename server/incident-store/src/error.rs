//! Structured error types for the incident store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("incident not found: {id}")]
  NotFound { id: String },

  #[error("io: {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl StoreError {
  pub fn not_found(id: &str) -> Self {
    Self::NotFound { id: id.to_string() }
  }

  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}
