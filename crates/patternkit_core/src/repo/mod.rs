//! Repository layer over the persistence context.
//!
//! # Responsibility
//! - Offer a collection-like CRUD contract per entity type.
//! - Translate persistence-context failures into caller-facing semantic errors.
//!
//! # Invariants
//! - Mutations are staged; only `save` writes to the store.
//! - Reads reflect the live context, unsaved staged changes included.
//! - A repository uses the same context for its whole lifetime.

pub mod employee_repo;
pub mod error;
pub mod generic_repo;

pub use employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use error::{RepoError, RepoResult, ValidationFailure};
pub use generic_repo::{GenericRepository, Repository};
