// rorqual/src/repository/filesystem.rs

//! JSON-file record storage: one `<id>.json` file per record, one directory per entity kind.

use crate::error::{RorqualError, RorqualResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{event, Level};

pub const RECORD_EXTENSION: &str = "json";

/// Path of the record stored under `id` in `directory`.
///
/// The id must name a single file directly inside `directory`: empty ids, path
/// separators, `.`/`..` and absolute paths are rejected with `InvalidRecordId`.
pub fn record_path(directory: &Path, id: &str) -> RorqualResult<PathBuf> {
  validate_record_id(id)?;
  Ok(directory.join(format!("{}.{}", id, RECORD_EXTENSION)))
}

fn validate_record_id(id: &str) -> RorqualResult<()> {
  let reason = if id.is_empty() {
    Some("id is empty")
  } else if id.contains(['/', '\\', '\0']) {
    Some("id contains a path separator or NUL")
  } else if id == "." || id == ".." {
    Some("id is a relative path component")
  } else if !matches!(Path::new(id).components().next(), Some(Component::Normal(_))) {
    Some("id is not a plain file name")
  } else {
    None
  };

  match reason {
    Some(reason) => {
      event!(Level::WARN, id, reason, "Rejected record id.");
      Err(RorqualError::InvalidRecordId {
        id: id.to_string(),
        reason: reason.to_string(),
      })
    }
    None => Ok(()),
  }
}

/// Writes `model` to `path`, creating parent directories as needed. Overwrites.
///
/// The encoded record goes to a temporary file in the same directory first and
/// is then renamed over `path`, so readers see either the old or the new record.
pub fn write_record<M: Serialize>(path: &Path, model: &M) -> RorqualResult<()> {
  let parent = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent).map_err(|e| RorqualError::storage(parent, e))?;

  let encoded = serde_json::to_string_pretty(model).map_err(|e| RorqualError::serialization(path, e))?;
  let mut staged = NamedTempFile::new_in(parent).map_err(|e| RorqualError::storage(parent, e))?;
  staged
    .write_all(encoded.as_bytes())
    .and_then(|()| staged.as_file().sync_all())
    .map_err(|e| RorqualError::storage(staged.path(), e))?;
  staged.persist(path).map_err(|e| RorqualError::storage(path, e.error))?;

  event!(Level::TRACE, path = %path.display(), "Record written.");
  Ok(())
}

/// Reads the record at `path`. A missing file is `Ok(None)`.
pub fn read_record<M: DeserializeOwned>(path: &Path) -> RorqualResult<Option<M>> {
  let contents = match fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(RorqualError::storage(path, e)),
  };
  let model = serde_json::from_str(&contents).map_err(|e| RorqualError::serialization(path, e))?;
  event!(Level::TRACE, path = %path.display(), "Record read.");
  Ok(Some(model))
}

/// Removes the record at `path`. Returns `false` if there was nothing to remove.
pub fn remove_record(path: &Path) -> RorqualResult<bool> {
  match fs::remove_file(path) {
    Ok(()) => Ok(true),
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
    Err(e) => Err(RorqualError::storage(path, e)),
  }
}

/// Ids of every record in `directory`, sorted. A missing directory holds no records.
pub fn list_record_ids(directory: &Path) -> RorqualResult<Vec<String>> {
  let entries = match fs::read_dir(directory) {
    Ok(entries) => entries,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(RorqualError::storage(directory, e)),
  };

  let mut ids = Vec::new();
  for entry in entries {
    let path = entry.map_err(|e| RorqualError::storage(directory, e))?.path();
    if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
      continue;
    }
    if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
      ids.push(stem.to_string());
    }
  }
  ids.sort();
  Ok(ids)
}
