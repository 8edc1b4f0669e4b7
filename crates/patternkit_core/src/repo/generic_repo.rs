//! Generic repository contract and its persistence-context implementation.
//!
//! # Responsibility
//! - Provide `get_all/get_by_id/insert/update/delete/save` for any `Entity`.
//! - Stage mutations in the shared context; flush only on `save`.
//!
//! # Invariants
//! - Absent entities (`None`) are rejected with `InvalidArgument` before any
//!   staging happens.
//! - A repository either owns its context (`open*`) or borrows the one of a
//!   unit of work (`with_context`); only the owner may dispose it.

use crate::config::DatabaseLocation;
use crate::context::{PersistenceContext, SharedContext};
use crate::model::{Entity, EntityKey};
use crate::repo::error::{RepoError, RepoResult};
use log::{debug, warn};
use std::cell::{Ref, RefMut};
use std::marker::PhantomData;
use std::rc::Rc;

/// Collection-like CRUD contract over one entity type.
pub trait Repository<T: Entity> {
    /// All live entities ordered by key.
    fn get_all(&self) -> RepoResult<Vec<T>>;
    /// Returns `NotFound` when no live entity has `key`.
    fn get_by_id(&self, key: EntityKey) -> RepoResult<T>;
    /// Stages an add. `None` fails with `InvalidArgument`.
    fn insert(&self, entity: impl Into<Option<T>>) -> RepoResult<()>;
    /// Stages new values for a live entity. `None` fails with `InvalidArgument`.
    fn update(&self, entity: impl Into<Option<T>>) -> RepoResult<()>;
    /// Stages removal by key.
    fn delete(&self, key: EntityKey) -> RepoResult<()>;
    /// Stages removal of the entity's key. `None` fails with `InvalidArgument`.
    fn delete_entity(&self, entity: impl Into<Option<T>>) -> RepoResult<()>;
    /// Flushes every staged change of the underlying context.
    fn save(&self) -> RepoResult<usize>;
}

impl<T: Entity, R: Repository<T>> Repository<T> for Rc<R> {
    fn get_all(&self) -> RepoResult<Vec<T>> {
        (**self).get_all()
    }

    fn get_by_id(&self, key: EntityKey) -> RepoResult<T> {
        (**self).get_by_id(key)
    }

    fn insert(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        (**self).insert(entity)
    }

    fn update(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        (**self).update(entity)
    }

    fn delete(&self, key: EntityKey) -> RepoResult<()> {
        (**self).delete(key)
    }

    fn delete_entity(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        (**self).delete_entity(entity)
    }

    fn save(&self) -> RepoResult<usize> {
        (**self).save()
    }
}

/// Repository for any `Entity`, backed by a (possibly shared) context.
pub struct GenericRepository<T: Entity> {
    context: SharedContext,
    owns_context: bool,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> GenericRepository<T> {
    /// Opens a private context on `location`; this repository owns it.
    pub fn open(location: &DatabaseLocation) -> RepoResult<Self> {
        let context = PersistenceContext::open(location)?;
        Ok(Self {
            context: context.into_shared(),
            owns_context: true,
            _entity: PhantomData,
        })
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::open(&DatabaseLocation::Memory)
    }

    /// Binds to a context owned elsewhere, typically by a unit of work.
    pub fn with_context(context: SharedContext) -> Self {
        Self {
            context,
            owns_context: false,
            _entity: PhantomData,
        }
    }

    pub fn context(&self) -> &SharedContext {
        &self.context
    }

    pub fn owns_context(&self) -> bool {
        self.owns_context
    }

    /// Lazily filters a snapshot of the live entities.
    pub fn find<P>(&self, predicate: P) -> RepoResult<impl Iterator<Item = T>>
    where
        P: FnMut(&T) -> bool,
    {
        Ok(self.get_all()?.into_iter().filter(predicate))
    }

    /// Stages every entity and saves them in one batch.
    ///
    /// If any entity cannot be staged, the ones staged by this call are
    /// un-staged again before the error is returned.
    pub fn insert_many(&self, entities: impl IntoIterator<Item = T>) -> RepoResult<usize> {
        let mut staged_keys = Vec::new();
        for entity in entities {
            let key = entity.key();
            if let Err(err) = self.insert(entity) {
                let mut ctx = self.ctx_mut()?;
                for staged in staged_keys {
                    ctx.remove::<T>(staged)?;
                }
                return Err(err);
            }
            staged_keys.push(key);
        }
        self.save()
    }

    /// Releases the context if this repository owns it.
    pub fn dispose(&self) -> RepoResult<()> {
        if !self.owns_context {
            debug!(
                "event=repo_dispose module=repo entity={} status=skipped reason=shared_context",
                T::NAME
            );
            return Ok(());
        }
        self.ctx_mut()?.dispose()?;
        Ok(())
    }

    fn ctx(&self) -> RepoResult<Ref<'_, PersistenceContext>> {
        self.context
            .try_borrow()
            .map_err(|_| RepoError::InvalidState("persistence context is busy".to_string()))
    }

    fn ctx_mut(&self) -> RepoResult<RefMut<'_, PersistenceContext>> {
        self.context
            .try_borrow_mut()
            .map_err(|_| RepoError::InvalidState("persistence context is busy".to_string()))
    }
}

impl<T: Entity> Repository<T> for GenericRepository<T> {
    fn get_all(&self) -> RepoResult<Vec<T>> {
        Ok(self.ctx()?.list::<T>()?)
    }

    fn get_by_id(&self, key: EntityKey) -> RepoResult<T> {
        self.ctx()?
            .find::<T>(key)?
            .ok_or(RepoError::NotFound {
                entity: T::NAME,
                key,
            })
    }

    fn insert(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        let entity = require_entity::<T>(entity.into(), "insert")?;
        self.ctx_mut()?.add(entity)?;
        Ok(())
    }

    fn update(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        let entity = require_entity::<T>(entity.into(), "update")?;
        self.ctx_mut()?.mark_modified(entity)?;
        Ok(())
    }

    fn delete(&self, key: EntityKey) -> RepoResult<()> {
        self.ctx_mut()?.remove::<T>(key)?;
        Ok(())
    }

    fn delete_entity(&self, entity: impl Into<Option<T>>) -> RepoResult<()> {
        let entity = require_entity::<T>(entity.into(), "delete")?;
        self.delete(entity.key())
    }

    fn save(&self) -> RepoResult<usize> {
        Ok(self.ctx_mut()?.save_changes()?)
    }
}

impl<T: Entity> Drop for GenericRepository<T> {
    fn drop(&mut self) {
        if self.owns_context {
            if let Err(err) = self.dispose() {
                warn!(
                    "event=repo_dispose module=repo entity={} status=error error={err}",
                    T::NAME
                );
            }
        }
    }
}

fn require_entity<T: Entity>(entity: Option<T>, operation: &str) -> RepoResult<T> {
    entity.ok_or_else(|| {
        warn!(
            "event=repo_{operation} module=repo entity={} status=error error_code=absent_entity",
            T::NAME
        );
        RepoError::InvalidArgument(format!("{operation} requires an {} value", T::NAME))
    })
}
