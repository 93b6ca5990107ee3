// rorqual/src/task/registry.rs

use crate::core::manager::InMemoryManager;
use crate::task::definition::Task;
use std::sync::Arc;

/// Lookup used to resolve task ids stored in pipeline records.
pub trait TaskRegistry: Send + Sync {
  fn get(&self, task_id: &str) -> Option<Arc<Task>>;
}

/// The in-memory task manager.
pub type TaskManager = InMemoryManager<Task>;

impl TaskRegistry for InMemoryManager<Task> {
  fn get(&self, task_id: &str) -> Option<Arc<Task>> {
    InMemoryManager::get(self, task_id)
  }
}
