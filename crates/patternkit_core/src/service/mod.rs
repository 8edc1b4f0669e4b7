//! Client services over repositories and the unit of work.
//!
//! # Responsibility
//! - Turn repository calls into use-case level operations.
//! - Keep the CLI decoupled from persistence-context details.

pub mod department_transfer;
pub mod employee_service;

pub use department_transfer::DepartmentTransfer;
pub use employee_service::EmployeeService;
