//! Shared application state.

use std::path::PathBuf;

use incident_store::IncidentStore;

pub struct AppState {
  pub store: IncidentStore,
  /// Directory for uploaded photos, served under `/uploads/`.
  pub upload_dir: PathBuf,
}
