// rorqual/src/pipeline/mod.rs

//! Defines the `Pipeline` entity, its stored `PipelineModel`, and the repository converting between them.

pub mod definition;
pub mod model;
pub mod repository;

// Re-export the main types
pub use definition::{Pipeline, PipelineId};
pub use model::PipelineModel;
pub use repository::PipelineRepository;
