//! Core library for PatternKit.
//! Repository, unit-of-work and persistence-context layers over SQLite, plus
//! a catalogue of object-construction and adaptation patterns.

pub mod config;
pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod patterns;
pub mod repo;
pub mod service;
pub mod unit_of_work;

pub use config::{ConfigError, CoreConfig, DatabaseLocation};
pub use context::{ContextError, ContextResult, EntityState, PersistenceContext, SharedContext};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::department::Department;
pub use model::employee::Employee;
pub use model::{Entity, EntityKey, FieldError};
pub use repo::{
    EmployeeRepository, GenericRepository, RepoError, RepoResult, Repository,
    SqliteEmployeeRepository, ValidationFailure,
};
pub use service::{DepartmentTransfer, EmployeeService};
pub use unit_of_work::{TransactionState, UnitOfWork};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
