//! Photo persistence and lookup in the upload directory.

use std::path::{Path, PathBuf};

/// URL prefix under which uploads are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// A photo written to the upload directory.
#[derive(Debug)]
pub struct SavedUpload {
  /// Relative URL incidents reference it by.
  pub url: String,
  pub path: PathBuf,
}

/// Store `bytes` as `<random hex><original extension, lowercased>`.
pub async fn save_upload(
  dir: &Path,
  original_name: &str,
  bytes: &[u8],
) -> std::io::Result<SavedUpload> {
  let name = format!("{}{}", incident_store::new_id(), extension_of(original_name));
  let path = dir.join(&name);
  tokio::fs::write(&path, bytes).await?;
  tracing::info!(file = %name, size = bytes.len(), "upload saved");
  Ok(SavedUpload {
    url: format!("{UPLOADS_ROUTE}/{name}"),
    path,
  })
}

/// Remove a saved photo whose incident could not be stored.
pub async fn discard(upload: &SavedUpload) {
  if let Err(e) = tokio::fs::remove_file(&upload.path).await {
    tracing::warn!(path = %upload.path.display(), error = %e, "failed to remove orphaned upload");
  }
}

/// ".jpg" for "Photo.JPG", "" when there is no extension.
fn extension_of(file_name: &str) -> String {
  Path::new(file_name)
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| format!(".{}", e.to_lowercase()))
    .unwrap_or_default()
}

/// Resolve a requested upload name to a path inside `dir`, rejecting
/// anything that could escape it.
pub fn resolve(dir: &Path, name: &str) -> Option<PathBuf> {
  if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
    return None;
  }
  Some(dir.join(name))
}

pub fn content_type(name: &str) -> &'static str {
  match extension_of(name).as_str() {
    ".jpg" | ".jpeg" => "image/jpeg",
    ".png" => "image/png",
    ".gif" => "image/gif",
    ".webp" => "image/webp",
    ".heic" => "image/heic",
    _ => "application/octet-stream",
  }
}
