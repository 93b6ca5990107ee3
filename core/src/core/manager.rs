// rorqual/src/core/manager.rs

//! Entity managers: the canonical owners of entities.

use crate::core::entity::Entity;
use crate::error::RorqualResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

/// Receives the final state of an entity when a scoped edit ends.
pub trait EntityManager<E: Entity>: Send + Sync {
  /// Stores `entity` as the canonical copy, replacing any previous one with the same id.
  fn set(&self, entity: E) -> RorqualResult<()>;
}

/// An id-indexed, in-memory store of entities.
///
/// Entities are handed out as shared `Arc<E>` references; the manager keeps ownership.
#[derive(Debug)]
pub struct InMemoryManager<E: Entity> {
  entities: RwLock<HashMap<String, Arc<E>>>,
}

impl<E: Entity> Default for InMemoryManager<E> {
  fn default() -> Self {
    Self {
      entities: RwLock::new(HashMap::new()),
    }
  }
}

impl<E: Entity> InMemoryManager<E> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, id: &str) -> Option<Arc<E>> {
    self.entities.read().get(id).cloned()
  }

  /// All entities, ordered by id.
  pub fn get_all(&self) -> Vec<Arc<E>> {
    let mut all: Vec<Arc<E>> = self.entities.read().values().cloned().collect();
    all.sort_by(|a, b| a.id().cmp(b.id()));
    all
  }

  pub fn delete(&self, id: &str) -> Option<Arc<E>> {
    let removed = self.entities.write().remove(id);
    if removed.is_some() {
      event!(Level::DEBUG, manager_name = E::MANAGER_NAME, entity_id = id, "Entity removed.");
    }
    removed
  }

  pub fn len(&self) -> usize {
    self.entities.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.entities.read().is_empty()
  }
}

impl<E: Entity> EntityManager<E> for InMemoryManager<E> {
  fn set(&self, entity: E) -> RorqualResult<()> {
    event!(Level::DEBUG, manager_name = E::MANAGER_NAME, entity_id = entity.id(), "Entity stored.");
    let id = entity.id().to_string();
    self.entities.write().insert(id, Arc::new(entity));
    Ok(())
  }
}
