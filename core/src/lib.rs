// src/lib.rs

//! Rorqual: persistence and scoped edits for pipeline and task entities.
//!
//! Rorqual provides:
//!  - A generic `Repository` that converts entities to flat, serializable
//!    records and stores them as JSON files under a configurable root.
//!  - A `PipelineRepository` that resolves stored task ids against the live
//!    task registry when a pipeline is loaded.
//!  - A scoped-edit protocol (`Entity::begin_edit` / `Entity::edit`) that
//!    commits an edited entity to its owning manager exactly once.
//!  - A name-keyed `EntityManagers` registry that scoped edits commit into.

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod repository;
pub mod subscriber;
pub mod task;

// --- Re-exports for the Public API ---

pub use crate::config::{ConfigProvider, GlobalConfig, SharedConfig};
pub use crate::core::{EditGuard, EditState, Entity, EntityManager, InMemoryManager};
pub use crate::error::{NonExistingReason, RorqualError, RorqualResult};
pub use crate::pipeline::{Pipeline, PipelineId, PipelineModel, PipelineRepository};
pub use crate::registry::EntityManagers;
pub use crate::repository::{Repository, RepositoryManager};
pub use crate::subscriber::{Subscriber, SubscriberDescriptor, SubscriberRegistry};
pub use crate::task::{Task, TaskId, TaskManager, TaskRegistry};

/*
    Core Workflow:
    1. Create a `TaskManager` and store the tasks pipelines will reference.
    2. Create a `SubscriberRegistry` and register any pipeline callbacks under
       a `{module, name}` pair.
    3. Create a `SharedConfig` (or any `Fn() -> PathBuf`) for the storage root.
    4. Build a `PipelineRepository` from the three, and wrap it in a
       `RepositoryManager`.
    5. Register the managers in an `EntityManagers` under `Task::MANAGER_NAME`
       and `Pipeline::MANAGER_NAME`.
    6. Edit a pipeline with `pipeline.edit(&managers, |p| { ... })`; on exit the
       final state is saved exactly once.
    7. `repository.load(id)` rebuilds it, failing with `MissingTask` if a
       referenced task is gone.
*/
