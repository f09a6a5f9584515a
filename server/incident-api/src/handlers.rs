//! HTTP handlers for the incident API.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use incident_store::{
  normalize, Incident, IncidentPatch, IncidentStore, MonthlyCounts, RawSubmission,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{DeleteResponse, ListParams, ListResponse};
use crate::uploads;

/// Run a store operation off the async runtime. Store calls do synchronous
/// file I/O and may wait on the write lock.
async fn with_store<T, F>(state: &Arc<AppState>, op: F) -> Result<T, ApiError>
where
  F: FnOnce(&IncidentStore) -> T + Send + 'static,
  T: Send + 'static,
{
  let state = Arc::clone(state);
  let out = tokio::task::spawn_blocking(move || op(&state.store)).await?;
  Ok(out)
}

pub async fn home() -> &'static str {
  "Disaster Backend is running!"
}

pub async fn health() -> &'static str {
  "ok"
}

/// GET /api/incidents
pub async fn list_incidents(
  State(state): State<Arc<AppState>>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
  let filter = params.into_filter();
  let reports = with_store(&state, move |store| store.list(&filter)).await?;
  Ok(Json(ListResponse { reports }))
}

/// POST /api/incidents (multipart form, optional `image` file)
pub async fn create_incident(
  State(state): State<Arc<AppState>>,
  mut multipart: Multipart,
) -> Result<(StatusCode, Json<Incident>), ApiError> {
  let mut raw = RawSubmission::default();
  let mut image: Option<(String, Bytes)> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("multipart: {e}")))?
  {
    let name = field.name().unwrap_or_default().to_string();
    if name == "image" {
      let file_name = field.file_name().unwrap_or_default().to_string();
      let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("image: {e}")))?;
      // A file input left empty still sends a part, just without a filename.
      if !file_name.is_empty() {
        image = Some((file_name, data));
      }
      continue;
    }
    let value = field
      .text()
      .await
      .map_err(|e| ApiError::BadRequest(format!("{name}: {e}")))?;
    raw.set(&name, value);
  }

  let upload = match image {
    Some((file_name, data)) => {
      Some(uploads::save_upload(&state.upload_dir, &file_name, &data).await?)
    }
    None => None,
  };

  let fields = normalize(&raw, upload.as_ref().map(|u| u.url.clone()));
  let created = match with_store(&state, move |store| store.create(fields)).await {
    Ok(result) => result.map_err(ApiError::from),
    Err(e) => Err(e),
  };

  // The photo is only referenced by the incident; drop it if that never landed.
  if created.is_err() {
    if let Some(upload) = &upload {
      uploads::discard(upload).await;
    }
  }
  Ok((StatusCode::CREATED, Json(created?)))
}

/// PATCH /api/incidents/:id
///
/// The body is read leniently: each recognized key with the right type is
/// applied, everything else is ignored. `updatedAt` is always refreshed.
pub async fn update_incident(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  body: Bytes,
) -> Result<Json<Incident>, ApiError> {
  let patch = IncidentPatch::from_json_lenient(&body);
  let incident = with_store(&state, move |store| store.update(&id, &patch)).await??;
  Ok(Json(incident))
}

/// DELETE /api/incidents/:id
pub async fn delete_incident(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
  let deleted = with_store(&state, move |store| store.delete(&id)).await??;
  Ok(Json(DeleteResponse { deleted }))
}

/// GET /api/analytics/monthly
pub async fn monthly_analytics(
  State(state): State<Arc<AppState>>,
) -> Result<Json<MonthlyCounts>, ApiError> {
  let counts = with_store(&state, |store| store.monthly()).await?;
  Ok(Json(counts))
}

/// GET /uploads/:name
pub async fn serve_upload(
  State(state): State<Arc<AppState>>,
  Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  let path = uploads::resolve(&state.upload_dir, &name).ok_or(ApiError::NotFound)?;
  match tokio::fs::read(&path).await {
    Ok(content) => Ok(([(header::CONTENT_TYPE, uploads::content_type(&name))], content)),
    Err(e) => {
      tracing::debug!(file = %name, error = %e, "upload not found");
      Err(ApiError::NotFound)
    }
  }
}
