use patternkit_core::{
    DatabaseLocation, Department, DepartmentTransfer, Employee, EmployeeRepository, RepoError,
    Repository, TransactionState, UnitOfWork,
};
use std::rc::Rc;

fn file_location(dir: &tempfile::TempDir) -> DatabaseLocation {
    DatabaseLocation::File(dir.path().join("uow.db"))
}

#[test]
fn committed_changes_are_visible_to_a_new_unit_of_work() {
    let dir = tempfile::tempdir().unwrap();
    let location = file_location(&dir);

    {
        let mut uow = UnitOfWork::open(&location).unwrap();
        uow.create_transaction().unwrap();
        let employees = uow.repository::<Employee>().unwrap();
        let departments = uow.repository::<Department>().unwrap();
        employees.insert(Employee::new(1, "A", "Male", "IT")).unwrap();
        departments.insert(Department::new(1, "IT")).unwrap();
        assert_eq!(uow.save().unwrap(), 2);
        uow.commit().unwrap();
        assert_eq!(uow.transaction_state(), TransactionState::Committed);
    }

    let uow = UnitOfWork::open(&location).unwrap();
    assert_eq!(uow.repository::<Employee>().unwrap().get_all().unwrap().len(), 1);
    assert_eq!(
        uow.repository::<Department>().unwrap().get_by_id(1).unwrap().name,
        "IT"
    );
}

#[test]
fn rolled_back_changes_never_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let location = file_location(&dir);

    {
        let mut uow = UnitOfWork::open(&location).unwrap();
        uow.create_transaction().unwrap();
        let employees = uow.employees().unwrap();
        employees.insert(Employee::new(1, "A", "Male", "IT")).unwrap();
        uow.save().unwrap();
        assert_eq!(employees.get_all().unwrap().len(), 1);
        uow.rollback().unwrap();
        assert!(employees.get_all().unwrap().is_empty());
    }

    let uow = UnitOfWork::open(&location).unwrap();
    assert!(uow.repository::<Employee>().unwrap().get_all().unwrap().is_empty());
}

#[test]
fn dropping_an_active_transaction_rolls_it_back() {
    let dir = tempfile::tempdir().unwrap();
    let location = file_location(&dir);

    {
        let mut uow = UnitOfWork::open(&location).unwrap();
        uow.create_transaction().unwrap();
        uow.repository::<Department>()
            .unwrap()
            .insert(Department::new(1, "HR"))
            .unwrap();
        uow.save().unwrap();
    }

    let uow = UnitOfWork::open(&location).unwrap();
    assert!(uow.repository::<Department>().unwrap().get_all().unwrap().is_empty());
}

#[test]
fn save_outside_a_transaction_is_durable() {
    let dir = tempfile::tempdir().unwrap();
    let location = file_location(&dir);

    {
        let uow = UnitOfWork::open(&location).unwrap();
        uow.employees()
            .unwrap()
            .insert(Employee::new(7, "Kumar", "Male", "HR"))
            .unwrap();
        uow.save().unwrap();
    }

    let uow = UnitOfWork::open(&location).unwrap();
    assert_eq!(uow.employees().unwrap().get_by_id(7).unwrap().name, "Kumar");
}

#[test]
fn repositories_are_cached_per_type_and_share_one_context() {
    let uow = UnitOfWork::open_in_memory().unwrap();
    let first = uow.repository::<Employee>().unwrap();
    let second = uow.repository::<Employee>().unwrap();
    let departments = uow.repository::<Department>().unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(first.context(), uow.context()));
    assert!(Rc::ptr_eq(departments.context(), uow.context()));

    // One save flushes what every repository staged.
    first.insert(Employee::new(1, "A", "Male", "IT")).unwrap();
    departments.insert(Department::new(1, "IT")).unwrap();
    assert_eq!(uow.save().unwrap(), 2);
    assert_eq!(uow.employees().unwrap().employees_by_department("IT").unwrap().count(), 1);
}

#[test]
fn commit_and_rollback_require_an_active_transaction() {
    let mut uow = UnitOfWork::open_in_memory().unwrap();
    assert!(matches!(uow.commit(), Err(RepoError::InvalidState(_))));
    assert!(matches!(uow.rollback(), Err(RepoError::InvalidState(_))));

    uow.create_transaction().unwrap();
    assert!(matches!(
        uow.create_transaction(),
        Err(RepoError::InvalidState(_))
    ));
    uow.rollback().unwrap();
    assert!(matches!(uow.rollback(), Err(RepoError::InvalidState(_))));
}

#[test]
fn department_transfer_is_all_or_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let location = file_location(&dir);

    {
        let mut uow = UnitOfWork::open(&location).unwrap();
        uow.repository::<Department>()
            .unwrap()
            .insert(Department::new(1, "IT"))
            .unwrap();
        uow.repository::<Department>()
            .unwrap()
            .insert(Department::new(2, "HR"))
            .unwrap();
        uow.employees()
            .unwrap()
            .insert(Employee::new(1, "A", "Male", "IT"))
            .unwrap();
        uow.save().unwrap();

        // Renaming onto an existing name violates the unique constraint.
        let err = DepartmentTransfer::new(&mut uow).rename(1, "HR").unwrap_err();
        assert!(matches!(err, RepoError::Db(_)));
        assert_eq!(uow.transaction_state(), TransactionState::RolledBack);

        assert_eq!(DepartmentTransfer::new(&mut uow).rename(1, "Ops").unwrap(), 1);
    }

    let uow = UnitOfWork::open(&location).unwrap();
    assert_eq!(uow.employees().unwrap().get_by_id(1).unwrap().dept, "Ops");
    assert_eq!(
        uow.repository::<Department>().unwrap().get_by_id(1).unwrap().name,
        "Ops"
    );
}
