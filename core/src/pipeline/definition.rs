// rorqual/src/pipeline/definition.rs

//! Contains the `Pipeline` entity: a named, ordered composition of tasks.

use crate::core::entity::{EditState, Entity};
use crate::error::RorqualResult;
use crate::subscriber::{Subscriber, SubscriberDescriptor};
use crate::task::Task;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{event, Level};
use uuid::Uuid;

pub type PipelineId = String;

/// An ordered composition of tasks.
///
/// Tasks are shared references; their lifetime belongs to the task manager.
/// The task order is the execution order and may contain the same task twice.
#[derive(Clone)]
pub struct Pipeline {
  id: PipelineId,
  parent_id: Option<String>,
  config_id: String,
  properties: BTreeMap<String, Value>,
  tasks: Vec<Arc<Task>>,
  subscribers: Vec<Subscriber>,
  edit_state: EditState,
}

impl Pipeline {
  pub const ID_PREFIX: &'static str = "PIPELINE";

  /// Creates a pipeline with a fresh `PIPELINE_<config_id>_<uuid>` identifier.
  pub fn new(config_id: impl Into<String>, properties: BTreeMap<String, Value>, tasks: Vec<Arc<Task>>) -> Self {
    let config_id = config_id.into();
    let id = format!("{}_{}_{}", Self::ID_PREFIX, config_id, Uuid::new_v4());
    Self::with_id(id, config_id, properties, tasks)
  }

  pub fn with_id(
    id: impl Into<PipelineId>,
    config_id: impl Into<String>,
    properties: BTreeMap<String, Value>,
    tasks: Vec<Arc<Task>>,
  ) -> Self {
    Self {
      id: id.into(),
      parent_id: None,
      config_id: config_id.into(),
      properties,
      tasks,
      subscribers: Vec::new(),
      edit_state: EditState::Idle,
    }
  }

  pub fn with_parent_id(mut self, parent_id: Option<String>) -> Self {
    self.parent_id = parent_id;
    self
  }

  pub fn with_subscribers(mut self, subscribers: impl IntoIterator<Item = Subscriber>) -> Self {
    for subscriber in subscribers {
      self.add_subscriber(subscriber);
    }
    self
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

  /// Sets a property and returns the previous value, if any.
  pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.properties.insert(key.into(), value.into())
  }

  pub fn tasks(&self) -> &[Arc<Task>] {
    &self.tasks
  }

  /// Task ids in execution order.
  pub fn task_ids(&self) -> impl Iterator<Item = &str> + '_ {
    self.tasks.iter().map(|task| task.id())
  }

  pub fn add_task(&mut self, task: Arc<Task>) {
    self.tasks.push(task);
  }

  pub fn set_tasks(&mut self, tasks: Vec<Arc<Task>>) {
    self.tasks = tasks;
  }

  /// Removes every occurrence of `task_id`. Returns whether anything was removed.
  pub fn remove_task(&mut self, task_id: &str) -> bool {
    let before = self.tasks.len();
    self.tasks.retain(|task| task.id() != task_id);
    self.tasks.len() != before
  }

  pub fn subscribers(&self) -> &[Subscriber] {
    &self.subscribers
  }

  pub fn subscriber_descriptors(&self) -> impl Iterator<Item = &SubscriberDescriptor> + '_ {
    self.subscribers.iter().map(Subscriber::descriptor)
  }

  /// Attaches `subscriber` unless one with the same descriptor is already attached.
  pub fn add_subscriber(&mut self, subscriber: Subscriber) -> bool {
    if self.subscribers.iter().any(|s| s.descriptor() == subscriber.descriptor()) {
      return false;
    }
    self.subscribers.push(subscriber);
    true
  }

  pub fn remove_subscriber(&mut self, descriptor: &SubscriberDescriptor) -> bool {
    let before = self.subscribers.len();
    self.subscribers.retain(|s| s.descriptor() != descriptor);
    self.subscribers.len() != before
  }

  /// Calls every subscriber in the order they were attached. Stops at the first failure.
  pub fn notify_subscribers(&self) -> RorqualResult<()> {
    event!(Level::DEBUG, pipeline_id = %self.id, count = self.subscribers.len(), "Notifying subscribers.");
    for subscriber in &self.subscribers {
      if let Err(e) = subscriber.call(self) {
        event!(Level::ERROR, pipeline_id = %self.id, error = %e, "Subscriber failed.");
        return Err(e);
      }
    }
    Ok(())
  }
}

// Edit state is in-memory bookkeeping and does not take part in equality.
impl PartialEq for Pipeline {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.parent_id == other.parent_id
      && self.config_id == other.config_id
      && self.properties == other.properties
      && self.task_ids().eq(other.task_ids())
      && self.subscriber_descriptors().eq(other.subscriber_descriptors())
  }
}

impl fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Pipeline")
      .field("id", &self.id)
      .field("parent_id", &self.parent_id)
      .field("config_id", &self.config_id)
      .field("properties", &self.properties)
      .field("tasks", &self.task_ids().collect::<Vec<_>>())
      .field("subscribers", &self.subscriber_descriptors().collect::<Vec<_>>())
      .field("edit_state", &self.edit_state)
      .finish()
  }
}

impl Entity for Pipeline {
  const MANAGER_NAME: &'static str = "pipeline";

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
