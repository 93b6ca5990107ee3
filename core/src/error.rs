// rorqual/src/error.rs
use anyhow::Error as AnyhowError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a pipeline record was reported as non-existing.
///
/// The error surfaced to callers is the same for every reason; the reason is
/// kept so that "never stored" and "stored but unreadable" stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonExistingReason {
  /// The record decoded but a required field was absent.
  MissingField(&'static str),
}

impl fmt::Display for NonExistingReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      NonExistingReason::MissingField(field) => write!(f, "record is missing field '{}'", field),
    }
  }
}

#[derive(Debug, Error)]
pub enum RorqualError {
  #[error("No {kind} record stored under id '{id}'")]
  RecordNotFound { kind: String, id: String },

  #[error("Invalid record id '{id}': {reason}")]
  InvalidRecordId { id: String, reason: String },

  #[error("Task: {task_id} does not exist.")]
  MissingTask { task_id: String },

  #[error("Pipeline: {pipeline_id} does not exist.")]
  NonExistingPipeline {
    pipeline_id: String,
    reason: NonExistingReason,
  },

  #[error("Subscriber '{module}::{name}' is not registered")]
  UnknownSubscriber { module: String, name: String },

  #[error("Subscriber '{module}::{name}' failed. Source: {source}")]
  SubscriberFailure {
    module: String,
    name: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Entity '{entity_id}' owned by manager '{manager_name}' is already being edited")]
  EditInProgress { manager_name: String, entity_id: String },

  #[error("No entity manager registered under '{manager_name}'")]
  ManagerNotFound { manager_name: String },

  #[error("Type mismatch for entity manager '{manager_name}' (expected {expected_type})")]
  TypeMismatch {
    manager_name: String,
    expected_type: String,
  },

  #[error("Storage error at '{}'. Source: {source}", .path.display())]
  Storage {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Could not encode or decode record at '{}'. Source: {source}", .path.display())]
  Serialization {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Configuration error: {message}")]
  Configuration { message: String },

  #[error("Internal rorqual error: {0}")]
  Internal(String),
}

impl RorqualError {
  pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    RorqualError::Storage {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
    RorqualError::Serialization {
      path: path.into(),
      source,
    }
  }
}

pub type RorqualResult<T, E = RorqualError> = std::result::Result<T, E>;
