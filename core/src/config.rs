// rorqual/src/config.rs

//! Process-wide configuration and the accessor repositories use to read it.
//!
//! Repositories never cache the storage root. They hold a `ConfigProvider`
//! and ask it for the folder on every access, so changing the configuration
//! redirects the next `save`/`load` without rebuilding anything.

use crate::error::{RorqualError, RorqualResult};
use dotenvy::dotenv;
use parking_lot::RwLock;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{event, Level};

pub const STORAGE_FOLDER_ENV: &str = "RORQUAL_STORAGE_FOLDER";
pub const DEFAULT_STORAGE_FOLDER: &str = ".data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
  pub storage_folder: PathBuf,
}

impl Default for GlobalConfig {
  fn default() -> Self {
    Self {
      storage_folder: PathBuf::from(DEFAULT_STORAGE_FOLDER),
    }
  }
}

impl GlobalConfig {
  pub fn new(storage_folder: impl Into<PathBuf>) -> Self {
    Self {
      storage_folder: storage_folder.into(),
    }
  }

  /// Builds the configuration from `RORQUAL_STORAGE_FOLDER`, falling back to
  /// `.data` when the variable is unset. A `.env` file is loaded first if
  /// present; variables already set in the process take precedence.
  pub fn from_env() -> RorqualResult<Self> {
    dotenv().ok();

    let storage_folder = match env::var(STORAGE_FOLDER_ENV) {
      Ok(value) if value.trim().is_empty() => {
        return Err(RorqualError::Configuration {
          message: format!("'{}' is set but empty", STORAGE_FOLDER_ENV),
        });
      }
      Ok(value) => PathBuf::from(value),
      Err(env::VarError::NotPresent) => PathBuf::from(DEFAULT_STORAGE_FOLDER),
      Err(e) => {
        return Err(RorqualError::Configuration {
          message: format!("Invalid {}: {}", STORAGE_FOLDER_ENV, e),
        });
      }
    };

    event!(Level::INFO, storage_folder = %storage_folder.display(), "Configuration loaded.");
    Ok(Self { storage_folder })
  }
}

/// Read access to the configured storage root.
pub trait ConfigProvider: Send + Sync {
  fn storage_folder(&self) -> PathBuf;
}

impl<F> ConfigProvider for F
where
  F: Fn() -> PathBuf + Send + Sync,
{
  fn storage_folder(&self) -> PathBuf {
    self()
  }
}

/// Shared, mutable handle to a `GlobalConfig`. Clones observe each other's updates.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<RwLock<GlobalConfig>>);

impl SharedConfig {
  pub fn new(config: GlobalConfig) -> Self {
    SharedConfig(Arc::new(RwLock::new(config)))
  }

  pub fn from_env() -> RorqualResult<Self> {
    GlobalConfig::from_env().map(Self::new)
  }

  pub fn set_storage_folder(&self, storage_folder: impl Into<PathBuf>) {
    let storage_folder = storage_folder.into();
    event!(Level::DEBUG, storage_folder = %storage_folder.display(), "Storage folder updated.");
    self.0.write().storage_folder = storage_folder;
  }

  /// Copy of the current configuration.
  pub fn snapshot(&self) -> GlobalConfig {
    self.0.read().clone()
  }
}

impl ConfigProvider for SharedConfig {
  fn storage_folder(&self) -> PathBuf {
    self.0.read().storage_folder.clone()
  }
}
