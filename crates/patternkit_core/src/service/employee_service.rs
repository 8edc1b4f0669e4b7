//! Employee use-case service.
//!
//! # Responsibility
//! - Offer controller-style entry points over any `EmployeeRepository`.
//! - Finish every mutating call with `save()` so callers never see staged
//!   leftovers.
//!
//! # Invariants
//! - The service owns no persistent state of its own.
//! - Repository errors are returned unchanged.

use crate::model::employee::Employee;
use crate::model::EntityKey;
use crate::repo::{EmployeeRepository, RepoResult};
use log::info;

/// Controller over an employee repository.
pub struct EmployeeService<R: EmployeeRepository> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Inserts and saves a new employee.
    pub fn hire(&self, employee: Employee) -> RepoResult<()> {
        let key = employee.employee_id;
        self.repo.insert(employee)?;
        self.repo.save()?;
        info!("event=employee_hire module=service status=ok key={key}");
        Ok(())
    }

    pub fn get(&self, key: EntityKey) -> RepoResult<Employee> {
        self.repo.get_by_id(key)
    }

    pub fn list(&self) -> RepoResult<Vec<Employee>> {
        self.repo.get_all()
    }

    /// Moves one employee to `dept` and saves. Returns the updated record.
    pub fn transfer(&self, key: EntityKey, dept: &str) -> RepoResult<Employee> {
        let mut employee = self.repo.get_by_id(key)?;
        employee.set_dept(dept);
        self.repo.update(employee.clone())?;
        self.repo.save()?;
        info!("event=employee_transfer module=service status=ok key={key}");
        Ok(employee)
    }

    /// Deletes and saves. Fails with `NotFound` for an unknown key.
    pub fn dismiss(&self, key: EntityKey) -> RepoResult<()> {
        self.repo.delete(key)?;
        self.repo.save()?;
        info!("event=employee_dismiss module=service status=ok key={key}");
        Ok(())
    }

    /// Employees of one department, ordered by name.
    pub fn department_roster(&self, dept: &str) -> RepoResult<Vec<Employee>> {
        let mut roster = self.repo.employees_by_department(dept)?.collect::<Vec<_>>();
        roster.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::EmployeeService;
    use crate::model::employee::Employee;
    use crate::repo::{RepoError, SqliteEmployeeRepository};

    fn service() -> EmployeeService<SqliteEmployeeRepository> {
        EmployeeService::new(SqliteEmployeeRepository::open_in_memory().unwrap())
    }

    #[test]
    fn hire_then_transfer_persists_new_department() {
        let service = service();
        service.hire(Employee::new(1, "Pranaya", "Male", "IT")).unwrap();

        let moved = service.transfer(1, "HR").unwrap();
        assert_eq!(moved.dept, "HR");
        assert_eq!(service.get(1).unwrap(), moved);
    }

    #[test]
    fn roster_is_sorted_by_name() {
        let service = service();
        service.hire(Employee::new(1, "Rout", "Male", "IT")).unwrap();
        service.hire(Employee::new(2, "Anurag", "Male", "IT")).unwrap();
        service.hire(Employee::new(3, "Priyanka", "Female", "HR")).unwrap();

        let names = service
            .department_roster("IT")
            .unwrap()
            .into_iter()
            .map(|employee| employee.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Anurag", "Rout"]);
    }

    #[test]
    fn dismiss_unknown_key_is_not_found() {
        let service = service();
        assert!(matches!(
            service.dismiss(42),
            Err(RepoError::NotFound { key: 42, .. })
        ));
    }
}
