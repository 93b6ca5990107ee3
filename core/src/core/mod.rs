pub mod edit;
pub mod entity;
pub mod manager;

// Re-export key types for easier access from other rorqual modules (and lib.rs)
pub use edit::EditGuard;
pub use entity::{EditState, Entity};
pub use manager::{EntityManager, InMemoryManager};
