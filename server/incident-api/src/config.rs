//! Service configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use incident_store::StoreConfig;

#[derive(Debug, Clone)]
pub struct Config {
  pub host: String,
  pub port: u16,
  pub data_dir: PathBuf,
  pub upload_dir: PathBuf,
  /// Request body cap, mostly relevant for photo uploads.
  pub max_upload_bytes: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".to_string(),
      port: 8000,
      data_dir: PathBuf::from("data"),
      upload_dir: PathBuf::from("uploads"),
      max_upload_bytes: 16 * 1024 * 1024,
    }
  }
}

impl Config {
  /// Read `HOST`, `PORT`, `DATA_DIR`, `UPLOAD_DIR`, `MAX_UPLOAD_BYTES`;
  /// unset variables keep their defaults.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    if let Some(host) = lookup("HOST") {
      config.host = host;
    }
    if let Some(port) = lookup("PORT") {
      config.port = port.parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::InvalidEnvVar("PORT".into(), e.to_string())
      })?;
    }
    if let Some(dir) = lookup("DATA_DIR") {
      config.data_dir = dir.into();
    }
    if let Some(dir) = lookup("UPLOAD_DIR") {
      config.upload_dir = dir.into();
    }
    if let Some(max) = lookup("MAX_UPLOAD_BYTES") {
      config.max_upload_bytes = max.parse().map_err(|e: std::num::ParseIntError| {
        ConfigError::InvalidEnvVar("MAX_UPLOAD_BYTES".into(), e.to_string())
      })?;
    }
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.host.is_empty() {
      return Err(ConfigError::InvalidEnvVar("HOST".into(), "cannot be empty".into()));
    }
    if self.data_dir.as_os_str().is_empty() {
      return Err(ConfigError::InvalidEnvVar("DATA_DIR".into(), "cannot be empty".into()));
    }
    if self.upload_dir.as_os_str().is_empty() {
      return Err(ConfigError::InvalidEnvVar("UPLOAD_DIR".into(), "cannot be empty".into()));
    }
    Ok(())
  }

  pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
    format!("{}:{}", self.host, self.port)
      .parse()
      .map_err(|e: std::net::AddrParseError| {
        ConfigError::InvalidEnvVar("HOST".into(), e.to_string())
      })
  }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig::new(&self.data_dir)
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid environment variable {0}: {1}")]
  InvalidEnvVar(String, String),
}
