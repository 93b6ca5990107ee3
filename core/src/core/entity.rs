// rorqual/src/core/entity.rs

//! Defines the `Entity` capability shared by every persisted domain object.

use crate::core::edit::EditGuard;
use crate::error::{RorqualError, RorqualResult};
use crate::registry::EntityManagers;
use tracing::{event, Level};

/// Whether an entity is currently inside a scoped edit.
///
/// Only `Idle -> Editing` (begin) and `Editing -> Idle` (end) are valid. The
/// state lives on the in-memory value only and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
  #[default]
  Idle,
  Editing,
}

/// A domain object with a canonical copy owned by a named entity manager.
pub trait Entity: Clone + Send + Sync + 'static {
  /// Name under which the owning manager is registered in `EntityManagers`.
  const MANAGER_NAME: &'static str;

  fn id(&self) -> &str;

  fn edit_state(&self) -> EditState;

  /// Used by `EditGuard` to move between states. Callers should not need it.
  fn set_edit_state(&mut self, state: EditState);

  fn is_in_context(&self) -> bool {
    self.edit_state() == EditState::Editing
  }

  /// Begins a scoped edit. The returned guard commits the entity to its
  /// manager exactly once, either through `EditGuard::commit` or on drop.
  ///
  /// Fails with `EditInProgress` if the entity is already being edited.
  fn begin_edit<'a>(&'a mut self, managers: &'a EntityManagers) -> RorqualResult<EditGuard<'a, Self>> {
    EditGuard::begin(self, managers)
  }

  /// Runs `body` inside a scoped edit.
  ///
  /// The commit happens whether or not `body` succeeds. An error from `body`
  /// is returned after the commit; a commit failure is only returned when the
  /// body itself succeeded.
  fn edit<T, Error, F>(&mut self, managers: &EntityManagers, body: F) -> Result<T, Error>
  where
    F: FnOnce(&mut Self) -> Result<T, Error>,
    Error: From<RorqualError>,
  {
    let mut guard = self.begin_edit(managers)?;
    let outcome = body(&mut *guard);
    let committed = guard.commit();

    match outcome {
      Ok(value) => {
        committed?;
        Ok(value)
      }
      Err(e) => {
        if let Err(commit_err) = committed {
          event!(
            Level::ERROR,
            manager_name = Self::MANAGER_NAME,
            error = %commit_err,
            "Commit after failed edit body also failed."
          );
        }
        Err(e)
      }
    }
  }
}
