//! Core store: owns the durable collection file and runs every operation
//! as load → (mutate → save) against a fresh snapshot.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::analytics;
use crate::config::StoreConfig;
use crate::date;
use crate::error::StoreError;
use crate::query;
use crate::types::*;

/// Globally unique opaque id: 128 random bits, hex encoded (32 chars).
pub fn new_id() -> String {
  uuid::Uuid::new_v4().simple().to_string()
}

/// The incident store. Mutations are serialized through an internal lock so
/// concurrent writers cannot lose each other's updates; reads are lock-free.
pub struct IncidentStore {
  config: StoreConfig,
  write_lock: Mutex<()>,
}

impl IncidentStore {
  /// Open the store, creating the data directory if needed.
  pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
    fs::create_dir_all(&config.data_dir).map_err(|e| StoreError::io(&config.data_dir, e))?;
    tracing::info!(path = %config.db_path().display(), "incident store opened");
    Ok(Self {
      config,
      write_lock: Mutex::new(()),
    })
  }

  pub fn path(&self) -> PathBuf {
    self.config.db_path()
  }

  // -------------------------------------------------------------------------
  // Persistence
  // -------------------------------------------------------------------------

  /// Load the current collection. A missing or unreadable file yields an
  /// empty collection so reads stay available.
  pub fn load(&self) -> Collection {
    match self.try_load() {
      Ok(Some(c)) => c,
      Ok(None) => Collection::default(),
      Err(e) => {
        tracing::warn!(error = %e, "incident file unreadable, treating as empty");
        Collection::default()
      }
    }
  }

  /// `Ok(None)` when the file does not exist.
  fn try_load(&self) -> Result<Option<Collection>, StoreError> {
    let path = self.config.db_path();
    let raw = match fs::read(&path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(StoreError::io(path, e)),
    };
    let collection = serde_json::from_slice(&raw)?;
    Ok(Some(collection))
  }

  /// Snapshot for a read-modify-write. Only a corrupt document is replaced by
  /// an empty collection; an I/O failure aborts the mutation so existing
  /// records are never overwritten by a transient read error.
  fn load_for_write(&self) -> Result<Collection, StoreError> {
    match self.try_load() {
      Ok(c) => Ok(c.unwrap_or_default()),
      Err(StoreError::Json(e)) => {
        tracing::warn!(error = %e, "incident file corrupt, starting from empty");
        Ok(Collection::default())
      }
      Err(e) => Err(e),
    }
  }

  /// Replace the durable file atomically: write `<file>.tmp`, then rename
  /// over the target. Any failure is returned and the old file is left intact.
  pub fn save(&self, collection: &Collection) -> Result<(), StoreError> {
    let tmp = self.config.tmp_path();
    let path = self.config.db_path();

    if let Err(e) = write_json(&tmp, collection) {
      let _ = fs::remove_file(&tmp);
      return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, &path) {
      let _ = fs::remove_file(&tmp);
      return Err(StoreError::io(path, e));
    }
    tracing::debug!(reports = collection.reports.len(), "incident file saved");
    Ok(())
  }

  fn lock(&self) -> MutexGuard<'_, ()> {
    // The guarded value is `()`, so a poisoned lock carries no broken state.
    self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
  }

  // -------------------------------------------------------------------------
  // Mutations
  // -------------------------------------------------------------------------

  /// Create a new incident with a fresh id, status "Reported" and
  /// `createdAt == updatedAt == now`, then persist it.
  pub fn create(&self, fields: NewIncident) -> Result<Incident, StoreError> {
    let now = date::now_timestamp();
    let category = fields
      .category
      .filter(|c| !c.trim().is_empty())
      .unwrap_or_else(|| CATEGORY_OTHER.to_string());

    let incident = Incident {
      id: new_id(),
      title: fields.title.trim().to_string(),
      description: fields.description.trim().to_string(),
      category,
      department: fields.department.filter(|d| !d.is_empty()),
      location: fields.location,
      image_url: fields.image_url,
      status: STATUS_REPORTED.to_string(),
      created_at: now.clone(),
      updated_at: now,
      reported_by_device_id: fields.reported_by_device_id,
    };

    let _guard = self.lock();
    let mut data = self.load_for_write()?;
    data.reports.push(incident.clone());
    self.save(&data)?;

    tracing::info!(id = %incident.id, category = %incident.category, "incident created");
    Ok(incident)
  }

  /// Apply `patch` to the incident with `id` and refresh `updatedAt`.
  ///
  /// Returns `StoreError::NotFound` (and writes nothing) for an unknown id.
  pub fn update(&self, id: &str, patch: &IncidentPatch) -> Result<Incident, StoreError> {
    let _guard = self.lock();
    let mut data = self.load_for_write()?;

    let incident = data
      .reports
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| StoreError::not_found(id))?;

    if let Some(status) = &patch.status {
      incident.status = status.clone();
    }
    if let Some(department) = &patch.department {
      incident.department = department.clone();
    }
    let now = date::now_timestamp();
    // Keep updatedAt >= createdAt even if the clock stepped backwards.
    incident.updated_at = now.max(incident.created_at.clone());

    let updated = incident.clone();
    self.save(&data)?;

    tracing::info!(id = %updated.id, status = %updated.status, "incident updated");
    Ok(updated)
  }

  /// Remove every incident with `id` and return how many were removed.
  /// Deleting an unknown id is a successful no-op returning 0.
  pub fn delete(&self, id: &str) -> Result<usize, StoreError> {
    let _guard = self.lock();
    let mut data = self.load_for_write()?;

    let before = data.reports.len();
    data.reports.retain(|r| r.id != id);
    let deleted = before - data.reports.len();
    self.save(&data)?;

    tracing::info!(id = %id, deleted, "incident delete");
    Ok(deleted)
  }

  // -------------------------------------------------------------------------
  // Reads
  // -------------------------------------------------------------------------

  /// Filtered incidents, newest first.
  pub fn list(&self, filter: &IncidentFilter) -> Vec<Incident> {
    query::filter_and_sort(&self.load().reports, filter)
  }

  /// Category counts for the current UTC month.
  pub fn monthly(&self) -> MonthlyCounts {
    analytics::monthly_counts(&self.load().reports, Utc::now())
  }
}

fn write_json(path: &std::path::Path, collection: &Collection) -> Result<(), StoreError> {
  let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
  let mut w = BufWriter::new(file);
  serde_json::to_writer(&mut w, collection)?;
  w.flush().map_err(|e| StoreError::io(path, e))?;
  w.get_ref().sync_all().map_err(|e| StoreError::io(path, e))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn open_temp() -> (tempfile::TempDir, IncidentStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = IncidentStore::open(StoreConfig::new(dir.path().join("data"))).unwrap();
    (dir, store)
  }

  fn fields(title: &str, category: Option<&str>) -> NewIncident {
    NewIncident {
      title: title.into(),
      category: category.map(Into::into),
      ..Default::default()
    }
  }

  #[test]
  fn new_id_is_32_hex_chars() {
    let id = new_id();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(id, new_id());
  }

  #[test]
  fn missing_file_loads_empty() {
    let (_dir, store) = open_temp();
    assert!(!store.path().exists());
    assert!(store.load().reports.is_empty());
  }

  #[test]
  fn corrupt_file_loads_empty() {
    let (_dir, store) = open_temp();
    fs::write(store.path(), b"{ this is not json").unwrap();
    assert!(store.load().reports.is_empty());
  }

  #[test]
  fn read_error_aborts_mutation_instead_of_wiping() {
    let (_dir, store) = open_temp();
    // A directory at the file path makes every read fail with an I/O error.
    fs::create_dir(store.path()).unwrap();
    assert!(store.load().reports.is_empty());

    let err = store.create(fields("a", None)).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
    assert!(store.delete("x").is_err());
    assert!(store.path().is_dir());
  }

  #[test]
  fn corrupt_file_is_replaced_on_next_write() {
    let (_dir, store) = open_temp();
    fs::write(store.path(), b"[[[").unwrap();
    let inc = store.create(fields("a", None)).unwrap();
    assert_eq!(store.load().reports, vec![inc]);
  }

  #[test]
  fn create_sets_defaults() {
    let (_dir, store) = open_temp();
    let inc = store.create(fields("  smoke  ", None)).unwrap();
    assert_eq!(inc.title, "smoke");
    assert_eq!(inc.category, CATEGORY_OTHER);
    assert_eq!(inc.status, STATUS_REPORTED);
    assert_eq!(inc.created_at, inc.updated_at);
    assert!(inc.created_at.ends_with('Z'));
    assert_eq!(store.load().reports, vec![inc]);
  }

  #[test]
  fn save_leaves_no_tmp_file() {
    let (_dir, store) = open_temp();
    store.create(fields("a", Some("Fire"))).unwrap();
    assert!(store.path().exists());
    assert!(!StoreConfig::new(store.path().parent().unwrap()).tmp_path().exists());
  }

  #[test]
  fn save_fails_loudly_when_dir_is_gone() {
    let (dir, store) = open_temp();
    fs::remove_dir_all(dir.path().join("data")).unwrap();
    let err = store.create(fields("a", None)).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
  }

  #[test]
  fn update_applies_status_and_department() {
    let (_dir, store) = open_temp();
    let inc = store.create(fields("a", Some("Fire"))).unwrap();

    let patch = IncidentPatch {
      status: Some("In Progress".into()),
      department: Some(Some("Fire Dept".into())),
    };
    let updated = store.update(&inc.id, &patch).unwrap();
    assert_eq!(updated.status, "In Progress");
    assert_eq!(updated.department.as_deref(), Some("Fire Dept"));
    assert_eq!(updated.created_at, inc.created_at);
    assert!(updated.updated_at >= inc.updated_at);

    // Absent department leaves it alone.
    let updated = store.update(&inc.id, &IncidentPatch::default()).unwrap();
    assert_eq!(updated.department.as_deref(), Some("Fire Dept"));

    // Explicitly empty department clears it.
    let clear = IncidentPatch {
      department: Some(None),
      ..Default::default()
    };
    let updated = store.update(&inc.id, &clear).unwrap();
    assert!(updated.department.is_none());
    assert_eq!(updated.status, "In Progress");
  }

  #[test]
  fn updated_at_never_precedes_created_at() {
    let (_dir, store) = open_temp();
    let mut inc = store.create(fields("a", None)).unwrap();
    inc.created_at = "2999-01-01T00:00:00.000000Z".into();
    inc.updated_at = inc.created_at.clone();
    store
      .save(&Collection {
        reports: vec![inc.clone()],
      })
      .unwrap();

    let updated = store.update(&inc.id, &IncidentPatch::default()).unwrap();
    assert_eq!(updated.created_at, "2999-01-01T00:00:00.000000Z");
    assert_eq!(updated.updated_at, updated.created_at);
  }

  #[test]
  fn update_unknown_id_is_not_found_and_writes_nothing() {
    let (_dir, store) = open_temp();
    store.create(fields("a", None)).unwrap();
    let before = fs::read(store.path()).unwrap();

    let err = store.update("missing", &IncidentPatch::default()).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(fs::read(store.path()).unwrap(), before);
  }

  #[test]
  fn delete_is_idempotent_after_first_call() {
    let (_dir, store) = open_temp();
    let a = store.create(fields("a", None)).unwrap();
    store.create(fields("b", None)).unwrap();

    assert_eq!(store.delete(&a.id).unwrap(), 1);
    assert_eq!(store.load().reports.len(), 1);
    assert_eq!(store.delete(&a.id).unwrap(), 0);
    assert_eq!(store.load().reports.len(), 1);
  }

  #[test]
  fn monthly_counts_fresh_records() {
    let (_dir, store) = open_temp();
    store.create(fields("a", Some("Fire"))).unwrap();
    store.create(fields("b", Some("Fire"))).unwrap();
    store.create(fields("c", Some("Medical"))).unwrap();
    let m = store.monthly();
    assert_eq!(m.counts["Fire"], 2);
    assert_eq!(m.counts["Medical"], 1);
    assert_eq!(m.counts["Flood"], 0);
  }
}
