//! Store configuration with sane defaults.

use std::path::PathBuf;

/// Where the incident collection lives on disk.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Directory holding the collection file. Created on open.
  pub data_dir: PathBuf,
  /// File name of the collection inside `data_dir`.
  pub file_name: String,
}

impl StoreConfig {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self {
      data_dir: data_dir.into(),
      ..Self::default()
    }
  }

  pub fn db_path(&self) -> PathBuf {
    self.data_dir.join(&self.file_name)
  }

  /// Sibling temp file used for atomic replace ("incidents.json.tmp").
  pub fn tmp_path(&self) -> PathBuf {
    self.data_dir.join(format!("{}.tmp", self.file_name))
  }
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from("data"),
      file_name: "incidents.json".to_string(),
    }
  }
}
