//! Constructor, setter and method injection of an employee directory.
//!
//! # Invariants
//! - Clients never construct their directory themselves.
//! - The setter-injected client reports `InjectionError::NotInitialized`
//!   instead of failing on an absent dependency.

use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    pub department: String,
}

impl DirectoryEntry {
    fn new(id: i64, name: &str, department: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            department: department.to_string(),
        }
    }
}

impl Display for DirectoryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID = {}, Name = {}, Department = {}",
            self.id, self.name, self.department
        )
    }
}

/// Data-access dependency injected into the clients below.
pub trait EmployeeDirectory {
    fn select_all_employees(&self) -> Vec<DirectoryEntry>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticEmployeeDirectory;

impl EmployeeDirectory for StaticEmployeeDirectory {
    fn select_all_employees(&self) -> Vec<DirectoryEntry> {
        vec![
            DirectoryEntry::new(1, "Pranaya", "IT"),
            DirectoryEntry::new(2, "Kumar", "HR"),
            DirectoryEntry::new(3, "Rout", "Payroll"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionError {
    NotInitialized(&'static str),
}

impl Display for InjectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized(dependency) => write!(f, "{dependency} is not initialized"),
        }
    }
}

impl Error for InjectionError {}

pub struct ConstructorInjected<D: EmployeeDirectory> {
    directory: D,
}

impl<D: EmployeeDirectory> ConstructorInjected<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn all_employees(&self) -> Vec<DirectoryEntry> {
        self.directory.select_all_employees()
    }
}

/// Dependency supplied after construction through `set_directory`.
#[derive(Default)]
pub struct SetterInjected {
    directory: Option<Box<dyn EmployeeDirectory>>,
}

impl SetterInjected {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_directory(&mut self, directory: Box<dyn EmployeeDirectory>) {
        self.directory = Some(directory);
    }

    pub fn directory(&self) -> Result<&dyn EmployeeDirectory, InjectionError> {
        self.directory
            .as_deref()
            .ok_or(InjectionError::NotInitialized("employee directory"))
    }

    pub fn all_employees(&self) -> Result<Vec<DirectoryEntry>, InjectionError> {
        Ok(self.directory()?.select_all_employees())
    }
}

/// Dependency passed to the one method that needs it.
#[derive(Debug, Default)]
pub struct MethodInjected;

impl MethodInjected {
    pub fn all_employees(&self, directory: &dyn EmployeeDirectory) -> Vec<DirectoryEntry> {
        directory.select_all_employees()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConstructorInjected, DirectoryEntry, EmployeeDirectory, InjectionError, MethodInjected,
        SetterInjected, StaticEmployeeDirectory,
    };

    struct EmptyDirectory;

    impl EmployeeDirectory for EmptyDirectory {
        fn select_all_employees(&self) -> Vec<DirectoryEntry> {
            Vec::new()
        }
    }

    #[test]
    fn every_injection_style_reads_the_same_rows() {
        let by_constructor = ConstructorInjected::new(StaticEmployeeDirectory).all_employees();
        let by_method = MethodInjected.all_employees(&StaticEmployeeDirectory);
        let mut setter = SetterInjected::new();
        setter.set_directory(Box::new(StaticEmployeeDirectory));

        assert_eq!(by_constructor.len(), 3);
        assert_eq!(by_constructor, by_method);
        assert_eq!(setter.all_employees().unwrap(), by_method);
        assert_eq!(by_method[2].to_string(), "ID = 3, Name = Rout, Department = Payroll");
    }

    #[test]
    fn setter_client_without_dependency_fails_typed() {
        let client = SetterInjected::new();
        assert_eq!(
            client.all_employees().unwrap_err(),
            InjectionError::NotInitialized("employee directory")
        );
    }

    #[test]
    fn substitute_directory_is_used() {
        assert!(ConstructorInjected::new(EmptyDirectory).all_employees().is_empty());
    }
}
