//! HTTP error mapping for the incident API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use incident_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found")]
  NotFound,

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("storage: {0}")]
  Storage(#[from] StoreError),

  #[error("upload io: {0}")]
  Upload(#[from] std::io::Error),

  #[error("blocking task: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "not_found" }))).into_response()
      }
      ApiError::BadRequest(message) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "bad_request", "message": message })),
      )
        .into_response(),
      ApiError::Storage(StoreError::NotFound { .. }) => ApiError::NotFound.into_response(),
      ApiError::Storage(e) => {
        tracing::error!(error = %e, "storage failure");
        storage_error()
      }
      ApiError::Upload(e) => {
        tracing::error!(error = %e, "upload write failure");
        storage_error()
      }
      ApiError::Join(e) => {
        tracing::error!(error = %e, "spawn_blocking join error");
        storage_error()
      }
    }
  }
}

fn storage_error() -> Response {
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "storage_error" })),
  )
    .into_response()
}
