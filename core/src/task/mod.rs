// rorqual/src/task/mod.rs

//! Tasks and the registry pipelines resolve them against.

pub mod definition;
pub mod registry;

pub use definition::{Task, TaskId};
pub use registry::{TaskManager, TaskRegistry};
