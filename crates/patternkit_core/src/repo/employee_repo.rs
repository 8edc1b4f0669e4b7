//! Employee-specific repository.
//!
//! # Responsibility
//! - Narrow the generic contract to `Employee`.
//! - Add attribute-filtered queries (department, gender).
//!
//! # Invariants
//! - Filter queries never fail for "no match"; they yield an empty iterator.
//! - Filters run against the live context, unsaved staged changes included.

use crate::config::DatabaseLocation;
use crate::context::SharedContext;
use crate::model::employee::Employee;
use crate::model::EntityKey;
use crate::repo::error::RepoResult;
use crate::repo::generic_repo::{GenericRepository, Repository};
use std::rc::Rc;

/// Repository interface for employee queries beyond plain CRUD.
pub trait EmployeeRepository: Repository<Employee> {
    fn employees_by_department(&self, dept: &str) -> RepoResult<impl Iterator<Item = Employee>>;
    fn employees_by_gender(&self, gender: &str) -> RepoResult<impl Iterator<Item = Employee>>;
}

impl<R: EmployeeRepository> EmployeeRepository for Rc<R> {
    fn employees_by_department(&self, dept: &str) -> RepoResult<impl Iterator<Item = Employee>> {
        (**self).employees_by_department(dept)
    }

    fn employees_by_gender(&self, gender: &str) -> RepoResult<impl Iterator<Item = Employee>> {
        (**self).employees_by_gender(gender)
    }
}

/// Employee repository layered on the generic repository of the same context.
pub struct SqliteEmployeeRepository {
    inner: Rc<GenericRepository<Employee>>,
}

impl SqliteEmployeeRepository {
    /// Opens a private context on `location`.
    pub fn open(location: &DatabaseLocation) -> RepoResult<Self> {
        Ok(Self::from_generic(Rc::new(GenericRepository::open(location)?)))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open(&DatabaseLocation::Memory)
    }

    /// Binds to a context owned elsewhere.
    pub fn with_context(context: SharedContext) -> Self {
        Self::from_generic(Rc::new(GenericRepository::with_context(context)))
    }

    /// Wraps an existing generic employee repository, sharing its context.
    pub fn from_generic(inner: Rc<GenericRepository<Employee>>) -> Self {
        Self { inner }
    }

    pub fn generic(&self) -> &Rc<GenericRepository<Employee>> {
        &self.inner
    }

    pub fn dispose(&self) -> RepoResult<()> {
        self.inner.dispose()
    }
}

impl Repository<Employee> for SqliteEmployeeRepository {
    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        self.inner.get_all()
    }

    fn get_by_id(&self, key: EntityKey) -> RepoResult<Employee> {
        self.inner.get_by_id(key)
    }

    fn insert(&self, entity: impl Into<Option<Employee>>) -> RepoResult<()> {
        self.inner.insert(entity)
    }

    fn update(&self, entity: impl Into<Option<Employee>>) -> RepoResult<()> {
        self.inner.update(entity)
    }

    fn delete(&self, key: EntityKey) -> RepoResult<()> {
        self.inner.delete(key)
    }

    fn delete_entity(&self, entity: impl Into<Option<Employee>>) -> RepoResult<()> {
        self.inner.delete_entity(entity)
    }

    fn save(&self) -> RepoResult<usize> {
        self.inner.save()
    }
}

impl EmployeeRepository for SqliteEmployeeRepository {
    fn employees_by_department(&self, dept: &str) -> RepoResult<impl Iterator<Item = Employee>> {
        let dept = dept.to_string();
        self.inner.find(move |employee| employee.dept == dept)
    }

    fn employees_by_gender(&self, gender: &str) -> RepoResult<impl Iterator<Item = Employee>> {
        let gender = gender.to_string();
        self.inner.find(move |employee| employee.gender == gender)
    }
}
