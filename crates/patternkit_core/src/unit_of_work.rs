//! Unit of work: one persistence context, one transaction boundary, and a
//! per-entity-type repository cache.
//!
//! # Responsibility
//! - Own the persistence context shared by every repository it hands out.
//! - Drive the transaction state machine
//!   `NoTransaction -> Active -> {Committed, RolledBack}`.
//! - Cache exactly one repository instance per entity type.
//!
//! # Invariants
//! - `repository::<T>()` returns the same `Rc` for the lifetime of the unit
//!   of work.
//! - At most one transaction is active at a time.
//! - `save` is independent of the transaction state and is the only
//!   operation that writes staged changes.
//! - Dropping the unit of work disposes the context even if callers still
//!   hold repository handles; later use of those handles fails with
//!   `Disposed`.

use crate::config::DatabaseLocation;
use crate::context::{PersistenceContext, SharedContext};
use crate::model::employee::Employee;
use crate::model::Entity;
use crate::repo::{GenericRepository, RepoError, RepoResult, SqliteEmployeeRepository};
use log::{error, info, warn};
use once_cell::unsync::OnceCell;
use std::any::{Any, TypeId};
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    NoTransaction,
    Active,
    Committed,
    RolledBack,
}

pub struct UnitOfWork {
    context: SharedContext,
    state: TransactionState,
    repositories: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    employees: OnceCell<Rc<SqliteEmployeeRepository>>,
}

impl UnitOfWork {
    pub fn open(location: &DatabaseLocation) -> RepoResult<Self> {
        Ok(Self::from_context(PersistenceContext::open(location)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open(&DatabaseLocation::Memory)
    }

    /// Takes ownership of an existing context.
    pub fn from_context(context: PersistenceContext) -> Self {
        Self {
            context: context.into_shared(),
            state: TransactionState::NoTransaction,
            repositories: RefCell::new(HashMap::new()),
            employees: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.state
    }

    /// Returns the cached repository for `T`, creating it on first request.
    pub fn repository<T: Entity>(&self) -> RepoResult<Rc<GenericRepository<T>>> {
        self.ensure_open()?;
        let mut cache = self.repositories.borrow_mut();
        let cached = cache.entry(TypeId::of::<T>()).or_insert_with(|| {
            info!(
                "event=uow_repository module=uow status=created entity={}",
                T::NAME
            );
            Rc::new(GenericRepository::<T>::with_context(Rc::clone(&self.context))) as Rc<dyn Any>
        });
        Rc::clone(cached)
            .downcast::<GenericRepository<T>>()
            .map_err(|_| {
                RepoError::InvalidState(format!("repository cache entry for {} has wrong type", T::NAME))
            })
    }

    /// Returns the cached employee repository, built over `repository::<Employee>()`.
    pub fn employees(&self) -> RepoResult<Rc<SqliteEmployeeRepository>> {
        if let Some(cached) = self.employees.get() {
            self.ensure_open()?;
            return Ok(Rc::clone(cached));
        }
        let generic = self.repository::<Employee>()?;
        let repo = self
            .employees
            .get_or_init(|| Rc::new(SqliteEmployeeRepository::from_generic(generic)));
        Ok(Rc::clone(repo))
    }

    /// Starts a transaction. Fails with `InvalidState` if one is active.
    pub fn create_transaction(&mut self) -> RepoResult<()> {
        if self.state == TransactionState::Active {
            return Err(RepoError::InvalidState(
                "a transaction is already active".to_string(),
            ));
        }
        self.ctx_mut()?.begin_transaction()?;
        self.state = TransactionState::Active;
        Ok(())
    }

    /// Makes everything saved inside the active transaction durable.
    pub fn commit(&mut self) -> RepoResult<()> {
        self.require_active("commit")?;
        {
            let mut ctx = self.ctx_mut()?;
            if ctx.pending_changes() > 0 {
                warn!(
                    "event=uow_commit module=uow status=warn reason=unsaved_changes pending={}",
                    ctx.pending_changes()
                );
            }
            ctx.commit_transaction()?;
        }
        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Undoes everything saved inside the active transaction and drops
    /// every staged change.
    pub fn rollback(&mut self) -> RepoResult<()> {
        self.require_active("rollback")?;
        self.ctx_mut()?.rollback_transaction()?;
        self.state = TransactionState::RolledBack;
        Ok(())
    }

    /// Number of staged changes not yet saved, across every repository.
    pub fn pending_changes(&self) -> RepoResult<usize> {
        let ctx = self
            .context
            .try_borrow()
            .map_err(|_| RepoError::InvalidState("persistence context is busy".to_string()))?;
        Ok(ctx.pending_changes())
    }

    /// Flushes every staged change of every repository in one batch.
    pub fn save(&self) -> RepoResult<usize> {
        Ok(self.ctx_mut()?.save_changes()?)
    }

    /// Releases the context; an active transaction is rolled back first.
    pub fn dispose(&mut self) -> RepoResult<()> {
        if self.state == TransactionState::Active {
            self.state = TransactionState::RolledBack;
        }
        self.ctx_mut()?.dispose()?;
        Ok(())
    }

    fn ctx_mut(&self) -> RepoResult<RefMut<'_, PersistenceContext>> {
        self.context
            .try_borrow_mut()
            .map_err(|_| RepoError::InvalidState("persistence context is busy".to_string()))
    }

    fn require_active(&self, operation: &str) -> RepoResult<()> {
        if self.state == TransactionState::Active {
            return Ok(());
        }
        Err(RepoError::InvalidState(format!(
            "{operation} requires an active transaction (state: {:?})",
            self.state
        )))
    }

    fn ensure_open(&self) -> RepoResult<()> {
        let ctx = self
            .context
            .try_borrow()
            .map_err(|_| RepoError::InvalidState("persistence context is busy".to_string()))?;
        if ctx.is_disposed() {
            return Err(RepoError::Disposed);
        }
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            error!("event=uow_drop module=uow status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TransactionState, UnitOfWork};
    use crate::model::department::Department;
    use crate::model::employee::Employee;
    use crate::repo::{RepoError, Repository};
    use std::rc::Rc;

    #[test]
    fn repository_cache_is_identity_stable_per_type() {
        let uow = UnitOfWork::open_in_memory().unwrap();

        let first = uow.repository::<Employee>().unwrap();
        let second = uow.repository::<Employee>().unwrap();
        let departments = uow.repository::<Department>().unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(first.context(), departments.context()));
        assert!(!first.owns_context());
    }

    #[test]
    fn specific_repository_shares_generic_instance() {
        let uow = UnitOfWork::open_in_memory().unwrap();

        let employees = uow.employees().unwrap();
        assert!(Rc::ptr_eq(&employees, &uow.employees().unwrap()));
        assert!(Rc::ptr_eq(
            employees.generic(),
            &uow.repository::<Employee>().unwrap()
        ));
    }

    #[test]
    fn state_machine_rejects_out_of_order_calls() {
        let mut uow = UnitOfWork::open_in_memory().unwrap();
        assert_eq!(uow.transaction_state(), TransactionState::NoTransaction);
        assert!(matches!(uow.commit(), Err(RepoError::InvalidState(_))));
        assert!(matches!(uow.rollback(), Err(RepoError::InvalidState(_))));

        uow.create_transaction().unwrap();
        assert!(matches!(
            uow.create_transaction(),
            Err(RepoError::InvalidState(_))
        ));
        uow.commit().unwrap();
        assert_eq!(uow.transaction_state(), TransactionState::Committed);
        assert!(matches!(uow.commit(), Err(RepoError::InvalidState(_))));

        uow.create_transaction().unwrap();
        uow.rollback().unwrap();
        assert_eq!(uow.transaction_state(), TransactionState::RolledBack);
    }

    #[test]
    fn rollback_discards_staged_changes() {
        let mut uow = UnitOfWork::open_in_memory().unwrap();
        let repo = uow.repository::<Employee>().unwrap();

        uow.create_transaction().unwrap();
        repo.insert(Employee::new(1, "A", "Male", "IT")).unwrap();
        uow.rollback().unwrap();

        assert_eq!(uow.context().borrow().pending_changes(), 0);
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn dispose_invalidates_handed_out_repositories() {
        let mut uow = UnitOfWork::open_in_memory().unwrap();
        let repo = uow.repository::<Employee>().unwrap();
        uow.dispose().unwrap();

        assert!(matches!(repo.get_all(), Err(RepoError::Disposed)));
        assert!(matches!(
            uow.repository::<Department>(),
            Err(RepoError::Disposed)
        ));
    }
}
