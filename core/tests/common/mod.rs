// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use rorqual::{
  EditState, Entity, EntityManager, EntityManagers, GlobalConfig, Pipeline, PipelineRepository, RorqualError,
  RorqualResult, SharedConfig, SubscriberRegistry, Task, TaskManager,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing::Level;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Managers for observing commits ---

/// Records every entity it receives, along with the edit state it had on arrival.
pub struct RecordingManager<E: Entity> {
  commits: Mutex<Vec<(E, EditState)>>,
}

impl<E: Entity> Default for RecordingManager<E> {
  fn default() -> Self {
    Self {
      commits: Mutex::new(Vec::new()),
    }
  }
}

impl<E: Entity> RecordingManager<E> {
  pub fn commit_count(&self) -> usize {
    self.commits.lock().unwrap().len()
  }

  pub fn last(&self) -> Option<(E, EditState)> {
    self.commits.lock().unwrap().last().cloned()
  }
}

impl<E: Entity> EntityManager<E> for RecordingManager<E> {
  fn set(&self, entity: E) -> RorqualResult<()> {
    let state = entity.edit_state();
    self.commits.lock().unwrap().push((entity, state));
    Ok(())
  }
}

/// Rejects every entity.
pub struct FailingManager;

impl<E: Entity> EntityManager<E> for FailingManager {
  fn set(&self, _entity: E) -> RorqualResult<()> {
    Err(RorqualError::Internal("manager unavailable".to_string()))
  }
}

// --- Common Test Error Type ---
#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("Rorqual error: {0}")]
  Rorqual(#[from] RorqualError),

  #[error("Test edit body failed: {0}")]
  Body(String),
}

// --- Fixture wiring a pipeline repository to a temporary storage root ---

pub struct Fixture {
  pub tasks: Arc<TaskManager>,
  pub subscribers: Arc<SubscriberRegistry>,
  pub config: SharedConfig,
  pub repository: Arc<PipelineRepository>,
  pub root: TempDir,
}

impl Fixture {
  pub fn new() -> Self {
    let root = tempfile::tempdir().expect("create temp storage root");
    let config = SharedConfig::new(GlobalConfig::new(root.path()));
    let tasks = Arc::new(TaskManager::new());
    let subscribers = Arc::new(SubscriberRegistry::new());
    let repository = Arc::new(PipelineRepository::new(
      tasks.clone(),
      subscribers.clone(),
      Arc::new(config.clone()),
    ));
    Self {
      tasks,
      subscribers,
      config,
      repository,
      root,
    }
  }

  /// Stores a task with a fixed id and returns the manager's shared copy.
  pub fn add_task(&self, id: &str) -> Arc<Task> {
    self.tasks.set(Task::with_id(id, format!("{}_cfg", id.to_lowercase()))).unwrap();
    self.tasks.get(id).unwrap()
  }
}

pub fn properties(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
  pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

pub fn pipeline_with_tasks(id: &str, tasks: Vec<Arc<Task>>) -> Pipeline {
  Pipeline::with_id(id, "pipeline_cfg", BTreeMap::new(), tasks)
}

pub fn managers_with<E: Entity, M: EntityManager<E> + 'static>(manager: Arc<M>) -> EntityManagers {
  let managers = EntityManagers::new();
  managers.register_manager::<E, M>(E::MANAGER_NAME, manager);
  managers
}
