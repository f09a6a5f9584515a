//! Disaster Incident API
//!
//! HTTP service in front of the incident store: report submission with photo
//! upload, operator listing/updates/deletes, monthly analytics.

mod config;
mod error;
mod handlers;
mod state;
mod types;
mod uploads;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use handlers::{
  create_incident, delete_incident, health, home, list_incidents, monthly_analytics, serve_upload,
  update_incident,
};
pub use state::AppState;

/// Build the full router over shared state.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
  Router::new()
    .route("/", get(home))
    .route("/health", get(health))
    .route("/api/incidents", get(list_incidents).post(create_incident))
    .route(
      "/api/incidents/:id",
      axum::routing::patch(update_incident).delete(delete_incident),
    )
    .route("/api/analytics/monthly", get(monthly_analytics))
    .route(&format!("{}/:name", uploads::UPLOADS_ROUTE), get(serve_upload))
    .layer(DefaultBodyLimit::max(max_upload_bytes))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(state)
}
