//! Persistence context: change tracking in front of one SQLite connection.
//!
//! # Responsibility
//! - Stage adds, modifications and removals per entity type.
//! - Answer reads from the live view (store rows overlaid with staged changes).
//! - Flush every staged change in one batch on `save_changes`.
//! - Own the transaction handle used by the unit of work.
//!
//! # Invariants
//! - Nothing reaches the store before `save_changes`.
//! - A failed `save_changes` writes nothing and keeps the staged set intact.
//! - After `dispose` every operation fails with `ContextError::Disposed`.
//! - No internal locking: shared handles are `Rc<RefCell<_>>` and callers
//!   serialize access.

mod entity_set;

pub use entity_set::EntityState;

use crate::config::DatabaseLocation;
use crate::db::{open_store, DbError};
use crate::model::{Entity, EntityKey, FieldError};
use entity_set::{select_all_sql, select_one_sql, EntitySet, Staged, StagedSet};
use log::{debug, error, info, warn};
use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;
use std::time::Instant;

/// Shared handle used when several repositories work against one context.
pub type SharedContext = Rc<RefCell<PersistenceContext>>;

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(Debug)]
pub enum ContextError {
    Db(DbError),
    /// Field-level problems found while validating staged entities on save.
    Validation(Vec<FieldError>),
    /// An entity with this key is already live in the context.
    DuplicateKey { entity: &'static str, key: EntityKey },
    /// No live entity with this key exists in the context.
    NotTracked { entity: &'static str, key: EntityKey },
    /// Two entity types were mapped onto the same table.
    TableConflict(&'static str),
    TransactionState(&'static str),
    Disposed,
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(errors) => {
                let lines = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                write!(f, "{lines}")
            }
            Self::DuplicateKey { entity, key } => {
                write!(f, "{entity} with key {key} is already tracked")
            }
            Self::NotTracked { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::TableConflict(table) => {
                write!(f, "table `{table}` is mapped by more than one entity type")
            }
            Self::TransactionState(message) => write!(f, "{message}"),
            Self::Disposed => write!(f, "persistence context has been disposed"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for ContextError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ContextError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Change tracker and transaction owner over one SQLite connection.
pub struct PersistenceContext {
    conn: Option<Connection>,
    sets: BTreeMap<&'static str, Box<dyn StagedSet>>,
    in_transaction: bool,
}

impl PersistenceContext {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            sets: BTreeMap::new(),
            in_transaction: false,
        }
    }

    pub fn open(location: &DatabaseLocation) -> ContextResult<Self> {
        Ok(Self::new(open_store(location)?))
    }

    pub fn open_in_memory() -> ContextResult<Self> {
        Self::open(&DatabaseLocation::Memory)
    }

    pub fn into_shared(self) -> SharedContext {
        Rc::new(RefCell::new(self))
    }

    pub fn is_disposed(&self) -> bool {
        self.conn.is_none()
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Number of staged changes across every entity type.
    pub fn pending_changes(&self) -> usize {
        self.sets.values().map(|set| set.pending()).sum()
    }

    /// Loads one entity from the live view.
    pub fn find<T: Entity>(&self, key: EntityKey) -> ContextResult<Option<T>> {
        self.ensure_open()?;
        match self.staged::<T>(key) {
            Some(Staged::Added(entity) | Staged::Modified(entity)) => Ok(Some(entity.clone())),
            Some(Staged::Removed) => Ok(None),
            None => self.load::<T>(key),
        }
    }

    /// Lists every entity of one type from the live view, ordered by key.
    pub fn list<T: Entity>(&self) -> ContextResult<Vec<T>> {
        let conn = self.conn()?;
        let mut live = BTreeMap::new();
        let mut stmt = conn.prepare_cached(&select_all_sql::<T>())?;
        let rows = stmt.query_map([], |row| T::from_row(row))?;
        for row in rows {
            let entity = row?;
            live.insert(entity.key(), entity);
        }

        if let Some(set) = self.set::<T>() {
            for (key, staged) in &set.entries {
                match staged {
                    Staged::Added(entity) | Staged::Modified(entity) => {
                        live.insert(*key, entity.clone());
                    }
                    Staged::Removed => {
                        live.remove(key);
                    }
                }
            }
        }

        Ok(live.into_values().collect())
    }

    /// Reports how this context currently sees one key.
    pub fn state_of<T: Entity>(&self, key: EntityKey) -> ContextResult<EntityState> {
        self.ensure_open()?;
        if let Some(staged) = self.staged::<T>(key) {
            return Ok(staged.state());
        }
        Ok(match self.load::<T>(key)? {
            Some(_) => EntityState::Unchanged,
            None => EntityState::Detached,
        })
    }

    /// Stages an entity as added.
    pub fn add<T: Entity>(&mut self, entity: T) -> ContextResult<()> {
        self.ensure_open()?;
        let key = entity.key();
        let staged = match self.staged::<T>(key).map(Staged::state) {
            Some(EntityState::Added | EntityState::Modified) => {
                return Err(ContextError::DuplicateKey {
                    entity: T::NAME,
                    key,
                })
            }
            // Re-adding over a staged removal overwrites the stored row.
            Some(_) => Staged::Modified(entity),
            None if self.load::<T>(key)?.is_some() => {
                return Err(ContextError::DuplicateKey {
                    entity: T::NAME,
                    key,
                })
            }
            None => Staged::Added(entity),
        };
        debug!(
            "event=context_stage module=context entity={} key={key} state={:?}",
            T::NAME,
            staged.state()
        );
        self.set_mut::<T>()?.entries.insert(key, staged);
        Ok(())
    }

    /// Stages new values for a live entity.
    pub fn mark_modified<T: Entity>(&mut self, entity: T) -> ContextResult<()> {
        self.ensure_open()?;
        let key = entity.key();
        let staged = match self.staged::<T>(key).map(Staged::state) {
            Some(EntityState::Added) => Staged::Added(entity),
            Some(EntityState::Removed) => return Err(not_tracked::<T>(key)),
            Some(_) => Staged::Modified(entity),
            None if self.load::<T>(key)?.is_some() => Staged::Modified(entity),
            None => return Err(not_tracked::<T>(key)),
        };
        debug!(
            "event=context_stage module=context entity={} key={key} state={:?}",
            T::NAME,
            staged.state()
        );
        self.set_mut::<T>()?.entries.insert(key, staged);
        Ok(())
    }

    /// Stages removal of a live entity. Removing an unsaved add un-stages it.
    pub fn remove<T: Entity>(&mut self, key: EntityKey) -> ContextResult<()> {
        self.ensure_open()?;
        match self.staged::<T>(key).map(Staged::state) {
            Some(EntityState::Added) => {
                self.set_mut::<T>()?.entries.remove(&key);
            }
            Some(EntityState::Removed) => return Err(not_tracked::<T>(key)),
            Some(_) => {
                self.set_mut::<T>()?.entries.insert(key, Staged::Removed);
            }
            None if self.load::<T>(key)?.is_some() => {
                self.set_mut::<T>()?.entries.insert(key, Staged::Removed);
            }
            None => return Err(not_tracked::<T>(key)),
        }
        debug!(
            "event=context_stage module=context entity={} key={key} state=Removed",
            T::NAME
        );
        Ok(())
    }

    /// Validates and writes every staged change in one savepoint.
    ///
    /// Returns the number of rows written.
    ///
    /// # Errors
    /// - `Validation` with every field error when any staged entity is invalid;
    ///   nothing is written and the staged set is kept.
    /// - `Db` when the store rejects the batch; the savepoint is rolled back
    ///   and the staged set is kept.
    pub fn save_changes(&mut self) -> ContextResult<usize> {
        let started_at = Instant::now();
        self.ensure_open()?;

        let mut errors = Vec::new();
        for set in self.sets.values() {
            set.validate(&mut errors);
        }
        if !errors.is_empty() {
            warn!(
                "event=context_save module=context status=error error_code=validation_failed field_errors={}",
                errors.len()
            );
            return Err(ContextError::Validation(errors));
        }

        let pending = self.pending_changes();
        if pending == 0 {
            return Ok(0);
        }

        let conn = self.conn.as_mut().ok_or(ContextError::Disposed)?;
        let written = match flush_sets(conn, &self.sets) {
            Ok(written) => written,
            Err(err) => {
                error!(
                    "event=context_save module=context status=error error_code=store_rejected pending={pending} error={err}"
                );
                return Err(err.into());
            }
        };

        for set in self.sets.values_mut() {
            set.clear();
        }
        info!(
            "event=context_save module=context status=ok pending={pending} written={written} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(written)
    }

    /// Drops every staged change without touching the store.
    pub fn discard_changes(&mut self) {
        let pending = self.pending_changes();
        for set in self.sets.values_mut() {
            set.clear();
        }
        if pending > 0 {
            info!("event=context_discard module=context status=ok discarded={pending}");
        }
    }

    pub fn begin_transaction(&mut self) -> ContextResult<()> {
        if self.in_transaction {
            return Err(ContextError::TransactionState(
                "a transaction is already active",
            ));
        }
        self.conn()?.execute_batch("BEGIN DEFERRED;")?;
        self.in_transaction = true;
        info!("event=tx_begin module=context status=ok");
        Ok(())
    }

    pub fn commit_transaction(&mut self) -> ContextResult<()> {
        if !self.in_transaction {
            return Err(ContextError::TransactionState("no active transaction"));
        }
        self.conn()?.execute_batch("COMMIT;")?;
        self.in_transaction = false;
        info!(
            "event=tx_commit module=context status=ok unsaved={}",
            self.pending_changes()
        );
        Ok(())
    }

    /// Rolls back the store transaction and discards every staged change.
    pub fn rollback_transaction(&mut self) -> ContextResult<()> {
        if !self.in_transaction {
            return Err(ContextError::TransactionState("no active transaction"));
        }
        self.conn()?.execute_batch("ROLLBACK;")?;
        self.in_transaction = false;
        self.discard_changes();
        info!("event=tx_rollback module=context status=ok");
        Ok(())
    }

    /// Releases the connection. Idempotent.
    ///
    /// An active transaction is rolled back first.
    pub fn dispose(&mut self) -> ContextResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if self.in_transaction {
            self.in_transaction = false;
            if let Err(err) = conn.execute_batch("ROLLBACK;") {
                warn!("event=context_dispose module=context status=error error_code=rollback_failed error={err}");
            }
        }
        self.discard_changes();

        conn.close().map_err(|(_, err)| {
            error!("event=context_dispose module=context status=error error_code=close_failed error={err}");
            ContextError::from(err)
        })?;
        info!("event=context_dispose module=context status=ok");
        Ok(())
    }

    fn ensure_open(&self) -> ContextResult<()> {
        self.conn().map(|_| ())
    }

    fn conn(&self) -> ContextResult<&Connection> {
        self.conn.as_ref().ok_or(ContextError::Disposed)
    }

    fn load<T: Entity>(&self, key: EntityKey) -> ContextResult<Option<T>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(&select_one_sql::<T>())?;
        let entity = stmt.query_row([key], |row| T::from_row(row)).optional()?;
        Ok(entity)
    }

    fn set<T: Entity>(&self) -> Option<&EntitySet<T>> {
        self.sets
            .get(T::TABLE)
            .and_then(|set| set.as_any().downcast_ref::<EntitySet<T>>())
    }

    fn set_mut<T: Entity>(&mut self) -> ContextResult<&mut EntitySet<T>> {
        self.sets
            .entry(T::TABLE)
            .or_insert_with(|| Box::new(EntitySet::<T>::default()))
            .as_any_mut()
            .downcast_mut::<EntitySet<T>>()
            .ok_or(ContextError::TableConflict(T::TABLE))
    }

    fn staged<T: Entity>(&self, key: EntityKey) -> Option<&Staged<T>> {
        self.set::<T>().and_then(|set| set.entries.get(&key))
    }
}

impl Drop for PersistenceContext {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            error!("event=context_drop module=context status=error error={err}");
        }
    }
}

fn flush_sets(
    conn: &mut Connection,
    sets: &BTreeMap<&'static str, Box<dyn StagedSet>>,
) -> rusqlite::Result<usize> {
    let savepoint = conn.savepoint()?;
    let mut written = 0;
    for set in sets.values() {
        written += set.flush(&savepoint)?;
    }
    savepoint.commit()?;
    Ok(written)
}

fn not_tracked<T: Entity>(key: EntityKey) -> ContextError {
    ContextError::NotTracked {
        entity: T::NAME,
        key,
    }
}
