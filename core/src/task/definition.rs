// rorqual/src/task/definition.rs

use crate::core::entity::{EditState, Entity};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

pub type TaskId = String;

/// A unit of work referenced by pipelines. Owned by the task manager.
#[derive(Debug, Clone)]
pub struct Task {
  id: TaskId,
  config_id: String,
  parent_id: Option<String>,
  properties: BTreeMap<String, Value>,
  edit_state: EditState,
}

impl Task {
  pub const ID_PREFIX: &'static str = "TASK";

  /// Creates a task with a fresh `TASK_<config_id>_<uuid>` identifier.
  pub fn new(config_id: impl Into<String>) -> Self {
    let config_id = config_id.into();
    let id = format!("{}_{}_{}", Self::ID_PREFIX, config_id, Uuid::new_v4());
    Self::with_id(id, config_id)
  }

  pub fn with_id(id: impl Into<TaskId>, config_id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      config_id: config_id.into(),
      parent_id: None,
      properties: BTreeMap::new(),
      edit_state: EditState::Idle,
    }
  }

  pub fn config_id(&self) -> &str {
    &self.config_id
  }

  pub fn parent_id(&self) -> Option<&str> {
    self.parent_id.as_deref()
  }

  pub fn set_parent_id(&mut self, parent_id: Option<String>) {
    self.parent_id = parent_id;
  }

  pub fn properties(&self) -> &BTreeMap<String, Value> {
    &self.properties
  }

  pub fn properties_mut(&mut self) -> &mut BTreeMap<String, Value> {
    &mut self.properties
  }
}

impl PartialEq for Task {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.config_id == other.config_id
      && self.parent_id == other.parent_id
      && self.properties == other.properties
  }
}

impl Entity for Task {
  const MANAGER_NAME: &'static str = "task";

  fn id(&self) -> &str {
    &self.id
  }

  fn edit_state(&self) -> EditState {
    self.edit_state
  }

  fn set_edit_state(&mut self, state: EditState) {
    self.edit_state = state;
  }
}
