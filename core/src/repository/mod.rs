// rorqual/src/repository/mod.rs

//! The persistence boundary: the generic `Repository` trait, its JSON-file
//! storage, and a manager that commits entities through a repository.

pub mod filesystem;
pub mod manager;
pub mod traits;

pub use manager::RepositoryManager;
pub use traits::Repository;
