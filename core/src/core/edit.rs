// rorqual/src/core/edit.rs

//! The scoped-edit guard returned by `Entity::begin_edit`.

use crate::core::entity::{EditState, Entity};
use crate::error::{RorqualError, RorqualResult};
use crate::registry::EntityManagers;
use std::ops::{Deref, DerefMut};
use tracing::{event, Level};

/// Exclusive access to an entity for the duration of one edit.
///
/// Ending the edit flips the entity back to `Idle` and hands a copy of it to
/// the manager registered under `E::MANAGER_NAME`. This happens once, either
/// through `commit` (which reports the registry's answer) or when the guard is
/// dropped, including during early returns and panic unwinding.
pub struct EditGuard<'a, E: Entity> {
  entity: &'a mut E,
  managers: &'a EntityManagers,
  finished: bool,
}

impl<'a, E: Entity> EditGuard<'a, E> {
  pub(crate) fn begin(entity: &'a mut E, managers: &'a EntityManagers) -> RorqualResult<Self> {
    if entity.edit_state() == EditState::Editing {
      event!(Level::WARN, manager_name = E::MANAGER_NAME, entity_id = entity.id(), "Edit already in progress.");
      return Err(RorqualError::EditInProgress {
        manager_name: E::MANAGER_NAME.to_string(),
        entity_id: entity.id().to_string(),
      });
    }

    entity.set_edit_state(EditState::Editing);
    event!(Level::TRACE, manager_name = E::MANAGER_NAME, entity_id = entity.id(), "Edit started.");
    Ok(Self {
      entity,
      managers,
      finished: false,
    })
  }

  /// Ends the edit and returns the result of notifying the owning manager.
  pub fn commit(mut self) -> RorqualResult<()> {
    self.finish()
  }

  fn finish(&mut self) -> RorqualResult<()> {
    self.finished = true;
    self.entity.set_edit_state(EditState::Idle);
    event!(Level::DEBUG, manager_name = E::MANAGER_NAME, entity_id = self.entity.id(), "Edit finished, committing.");
    self.managers.set_entity(E::MANAGER_NAME, self.entity.clone())
  }
}

impl<E: Entity> Deref for EditGuard<'_, E> {
  type Target = E;

  fn deref(&self) -> &E {
    self.entity
  }
}

impl<E: Entity> DerefMut for EditGuard<'_, E> {
  fn deref_mut(&mut self) -> &mut E {
    self.entity
  }
}

impl<E: Entity> Drop for EditGuard<'_, E> {
  fn drop(&mut self) {
    if self.finished {
      return;
    }
    if let Err(e) = self.finish() {
      event!(
        Level::ERROR,
        manager_name = E::MANAGER_NAME,
        error = %e,
        "Commit on drop failed."
      );
    }
  }
}
