// rorqual/src/repository/manager.rs

use crate::core::entity::Entity;
use crate::core::manager::EntityManager;
use crate::error::{RorqualError, RorqualResult};
use crate::repository::traits::Repository;
use std::sync::Arc;

/// An entity manager whose canonical copy is the stored record.
///
/// Registering it in `EntityManagers` makes every committed scoped edit a `save`.
pub struct RepositoryManager<R: Repository> {
  repository: Arc<R>,
}

impl<R: Repository> RepositoryManager<R> {
  pub fn new(repository: Arc<R>) -> Self {
    Self { repository }
  }

  pub fn repository(&self) -> &R {
    &self.repository
  }

  /// Loads the entity, mapping an absent record to `None`.
  pub fn get(&self, id: &str) -> RorqualResult<Option<R::Entity>> {
    match self.repository.load(id) {
      Ok(entity) => Ok(Some(entity)),
      Err(RorqualError::RecordNotFound { .. }) => Ok(None),
      Err(e) => Err(e),
    }
  }
}

impl<R> EntityManager<R::Entity> for RepositoryManager<R>
where
  R: Repository,
  R::Entity: Entity,
{
  fn set(&self, entity: R::Entity) -> RorqualResult<()> {
    self.repository.save(&entity)
  }
}
