//! Department rename that moves every member in one transaction.
//!
//! # Invariants
//! - Either the department and all of its employees change, or nothing does.
//! - Any failure after the transaction started rolls it back before the
//!   error reaches the caller.
//! - A rename never starts over unsaved changes staged by someone else.

use crate::model::department::Department;
use crate::model::EntityKey;
use crate::repo::{EmployeeRepository, RepoError, RepoResult, Repository};
use crate::unit_of_work::UnitOfWork;
use log::{error, info, warn};

/// Unit-of-work client coordinating the department and employee repositories.
pub struct DepartmentTransfer<'uow> {
    uow: &'uow mut UnitOfWork,
}

impl<'uow> DepartmentTransfer<'uow> {
    pub fn new(uow: &'uow mut UnitOfWork) -> Self {
        Self { uow }
    }

    /// Renames department `department_id` to `new_name` and re-points its
    /// employees. Returns the number of employees moved.
    ///
    /// Fails with `InvalidState` and leaves the context untouched if the unit
    /// of work already holds unsaved changes.
    pub fn rename(&mut self, department_id: EntityKey, new_name: &str) -> RepoResult<usize> {
        let pending = self.uow.pending_changes()?;
        if pending > 0 {
            return Err(RepoError::InvalidState(format!(
                "department rename needs a clean unit of work ({pending} unsaved changes)"
            )));
        }
        self.uow.create_transaction()?;
        match self.apply(department_id, new_name) {
            Ok(moved) => {
                self.uow.commit()?;
                info!(
                    "event=department_rename module=service status=ok key={department_id} moved={moved}"
                );
                Ok(moved)
            }
            Err(err) => {
                warn!(
                    "event=department_rename module=service status=error key={department_id} error={err}"
                );
                if let Err(rollback_err) = self.uow.rollback() {
                    error!(
                        "event=department_rename module=service status=error stage=rollback key={department_id} error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }

    fn apply(&self, department_id: EntityKey, new_name: &str) -> RepoResult<usize> {
        let departments = self.uow.repository::<Department>()?;
        let employees = self.uow.employees()?;

        let mut department = departments.get_by_id(department_id)?;
        let old_name = std::mem::replace(&mut department.name, new_name.to_string());
        departments.update(department)?;

        let members = employees
            .employees_by_department(&old_name)?
            .collect::<Vec<_>>();
        let moved = members.len();
        for mut employee in members {
            employee.set_dept(new_name);
            employees.update(employee)?;
        }

        self.uow.save()?;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::DepartmentTransfer;
    use crate::model::department::Department;
    use crate::model::employee::Employee;
    use crate::repo::{EmployeeRepository, RepoError, Repository};
    use crate::unit_of_work::{TransactionState, UnitOfWork};

    fn seeded() -> UnitOfWork {
        let uow = UnitOfWork::open_in_memory().unwrap();
        let departments = uow.repository::<Department>().unwrap();
        let employees = uow.employees().unwrap();
        departments.insert(Department::new(1, "IT")).unwrap();
        employees.insert(Employee::new(1, "A", "Male", "IT")).unwrap();
        employees.insert(Employee::new(2, "B", "Female", "IT")).unwrap();
        employees.insert(Employee::new(3, "C", "Male", "HR")).unwrap();
        uow.save().unwrap();
        uow
    }

    #[test]
    fn rename_moves_members_and_commits() {
        let mut uow = seeded();
        let moved = DepartmentTransfer::new(&mut uow).rename(1, "Engineering").unwrap();

        assert_eq!(moved, 2);
        assert_eq!(uow.transaction_state(), TransactionState::Committed);
        let employees = uow.employees().unwrap();
        assert_eq!(employees.employees_by_department("Engineering").unwrap().count(), 2);
        assert_eq!(employees.employees_by_department("IT").unwrap().count(), 0);
    }

    #[test]
    fn invalid_name_rolls_back_every_change() {
        let mut uow = seeded();
        let err = DepartmentTransfer::new(&mut uow).rename(1, " ").unwrap_err();

        assert!(matches!(err, RepoError::ValidationFailed(_)));
        assert_eq!(uow.transaction_state(), TransactionState::RolledBack);
        assert_eq!(uow.context().borrow().pending_changes(), 0);
        let department = uow.repository::<Department>().unwrap().get_by_id(1).unwrap();
        assert_eq!(department.name, "IT");
    }

    #[test]
    fn unknown_department_is_not_found() {
        let mut uow = seeded();
        assert!(matches!(
            DepartmentTransfer::new(&mut uow).rename(9, "Ops"),
            Err(RepoError::NotFound { key: 9, .. })
        ));
        assert_eq!(uow.transaction_state(), TransactionState::RolledBack);
    }

    #[test]
    fn rename_refuses_to_start_over_unsaved_changes() {
        let mut uow = seeded();
        let employees = uow.employees().unwrap();
        employees.insert(Employee::new(9, "Z", "Male", "HR")).unwrap();

        assert!(matches!(
            DepartmentTransfer::new(&mut uow).rename(42, "Ops"),
            Err(RepoError::InvalidState(_))
        ));
        assert!(matches!(
            DepartmentTransfer::new(&mut uow).rename(1, "Ops"),
            Err(RepoError::InvalidState(_))
        ));
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
        assert_eq!(uow.pending_changes().unwrap(), 1);
        assert_eq!(employees.get_by_id(9).unwrap().name, "Z");
        assert_eq!(
            uow.repository::<Department>().unwrap().get_by_id(1).unwrap().name,
            "IT"
        );

        uow.save().unwrap();
        assert_eq!(DepartmentTransfer::new(&mut uow).rename(1, "Ops").unwrap(), 2);
    }
}
