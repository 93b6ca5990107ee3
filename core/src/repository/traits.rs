// rorqual/src/repository/traits.rs

//! Defines the generic `Repository` persistence boundary.

use crate::error::{RorqualError, RorqualResult};
use crate::repository::filesystem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{event, Level};

/// Converts entities to and from a serializable record and stores the records
/// under `storage_folder()/DIR_NAME`.
///
/// Implementors supply the conversion and the storage root; the CRUD surface
/// (`save`, `load`, `load_all`, `list`, `exists`, `delete`, `delete_all`) is
/// provided here and shared by every entity kind.
pub trait Repository: Send + Sync {
  type Model: Serialize + DeserializeOwned;
  type Entity;

  /// Directory holding this kind's records, relative to the storage folder.
  const DIR_NAME: &'static str;

  /// Projects `entity` onto its record. Never fails and never mutates.
  fn to_model(&self, entity: &Self::Entity) -> Self::Model;

  /// Rebuilds an entity from its record, resolving embedded foreign ids.
  fn from_model(&self, model: Self::Model) -> RorqualResult<Self::Entity>;

  /// Storage key of a record.
  fn model_id(model: &Self::Model) -> &str;

  /// Current storage root. Read on every access.
  fn storage_folder(&self) -> PathBuf;

  fn directory(&self) -> PathBuf {
    self.storage_folder().join(Self::DIR_NAME)
  }

  fn save(&self, entity: &Self::Entity) -> RorqualResult<()> {
    let model = self.to_model(entity);
    let id = Self::model_id(&model);
    let path = filesystem::record_path(&self.directory(), id)?;
    event!(Level::DEBUG, kind = Self::DIR_NAME, id, path = %path.display(), "Saving record.");
    filesystem::write_record(&path, &model)
  }

  fn load(&self, id: &str) -> RorqualResult<Self::Entity> {
    let path = filesystem::record_path(&self.directory(), id)?;
    event!(Level::DEBUG, kind = Self::DIR_NAME, id, path = %path.display(), "Loading record.");
    let model = filesystem::read_record::<Self::Model>(&path)?.ok_or_else(|| {
      event!(Level::WARN, kind = Self::DIR_NAME, id, "Record not found.");
      RorqualError::RecordNotFound {
        kind: Self::DIR_NAME.to_string(),
        id: id.to_string(),
      }
    })?;
    self.from_model(model)
  }

  /// Every stored entity, in id order. Stops at the first record that fails to load.
  fn load_all(&self) -> RorqualResult<Vec<Self::Entity>> {
    self.list()?.iter().map(|id| self.load(id)).collect()
  }

  fn list(&self) -> RorqualResult<Vec<String>> {
    filesystem::list_record_ids(&self.directory())
  }

  /// An id that cannot name a record is reported as absent.
  fn exists(&self, id: &str) -> bool {
    filesystem::record_path(&self.directory(), id).is_ok_and(|path| path.is_file())
  }

  fn delete(&self, id: &str) -> RorqualResult<()> {
    let path = filesystem::record_path(&self.directory(), id)?;
    if filesystem::remove_record(&path)? {
      event!(Level::DEBUG, kind = Self::DIR_NAME, id, "Record deleted.");
      Ok(())
    } else {
      Err(RorqualError::RecordNotFound {
        kind: Self::DIR_NAME.to_string(),
        id: id.to_string(),
      })
    }
  }

  /// Removes every record of this kind. Returns how many were removed.
  fn delete_all(&self) -> RorqualResult<usize> {
    let directory = self.directory();
    let mut removed = 0;
    for id in filesystem::list_record_ids(&directory)? {
      if filesystem::remove_record(&filesystem::record_path(&directory, &id)?)? {
        removed += 1;
      }
    }
    event!(Level::DEBUG, kind = Self::DIR_NAME, removed, "Records deleted.");
    Ok(removed)
  }
}
