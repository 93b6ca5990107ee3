// rorqual/src/registry.rs

//! Defines `EntityManagers`, the name-keyed registry that scoped edits commit into.
//! Managers are registered for a concrete entity type and stored type-erased;
//! `set_entity` downcasts back to that type before handing the entity over.

use crate::core::entity::Entity;
use crate::core::manager::EntityManager;
use crate::error::{RorqualError, RorqualResult};

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased view of an `EntityManager<E>`.
trait AnyEntityManager: Send + Sync {
  /// `entity` is expected to be a `Box<dyn Any + Send>` containing the manager's `E`.
  fn set_erased(&self, manager_name: &str, entity: Box<dyn Any + Send>) -> RorqualResult<()>;
}

/// Wrapper for an `EntityManager<E>` so it can live in the registry map.
struct ManagerWrapper<E, M>
where
  E: Entity,
  M: EntityManager<E> + 'static,
{
  manager: Arc<M>,
  _phantom_entity: PhantomData<fn() -> E>,
}

impl<E, M> AnyEntityManager for ManagerWrapper<E, M>
where
  E: Entity,
  M: EntityManager<E> + 'static,
{
  fn set_erased(&self, manager_name: &str, entity: Box<dyn Any + Send>) -> RorqualResult<()> {
    let typed_entity = match entity.downcast::<E>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type_name = std::any::type_name::<E>();
        event!(Level::ERROR, manager_name, "Entity type mismatch. Expected {}.", expected_type_name);
        return Err(RorqualError::TypeMismatch {
          manager_name: manager_name.to_string(),
          expected_type: expected_type_name.to_string(),
        });
      }
    };
    self.manager.set(typed_entity)
  }
}

/// The entity-manager registry.
///
/// Shared by every scoped edit in the process; hold it in an `Arc`.
#[derive(Default)]
pub struct EntityManagers {
  managers: RwLock<HashMap<String, Arc<dyn AnyEntityManager>>>,
}

impl EntityManagers {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `manager` as the owner of entities of type `E` under `manager_name`.
  /// A previous registration under the same name is replaced.
  pub fn register_manager<E, M>(&self, manager_name: impl Into<String>, manager: Arc<M>)
  where
    E: Entity,
    M: EntityManager<E> + 'static,
  {
    let manager_name = manager_name.into();
    event!(Level::DEBUG, manager_name = %manager_name, entity_type = %std::any::type_name::<E>(), "Registering entity manager.");
    let wrapper = ManagerWrapper::<E, M> {
      manager,
      _phantom_entity: PhantomData,
    };
    self.managers.write().insert(manager_name, Arc::new(wrapper));
  }

  pub fn has_manager(&self, manager_name: &str) -> bool {
    self.managers.read().contains_key(manager_name)
  }

  /// Hands `entity` to the manager registered under `manager_name`.
  #[instrument(
    name = "EntityManagers::set_entity",
    skip_all,
    fields(manager_name = %manager_name, entity_id = %entity.id()),
    err(Display)
  )]
  pub fn set_entity<E: Entity>(&self, manager_name: &str, entity: E) -> RorqualResult<()> {
    let manager = self.managers.read().get(manager_name).cloned().ok_or_else(|| {
      event!(Level::ERROR, "No entity manager registered.");
      RorqualError::ManagerNotFound {
        manager_name: manager_name.to_string(),
      }
    })?;

    manager.set_erased(manager_name, Box::new(entity))
  }
}
