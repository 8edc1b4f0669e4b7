//! Per-entity-type staging area of the persistence context.
//!
//! # Invariants
//! - One `EntitySet<T>` per entity table inside a context.
//! - A key appears at most once; its `Staged` variant is the pending change.
//! - Flush order is removals, then updates, then inserts, so a value freed by
//!   a removal can be reused by an insert in the same batch.

use crate::model::{Entity, EntityKey, FieldError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::any::Any;
use std::collections::BTreeMap;

/// Change-tracking state of one entity as seen by a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Neither staged nor present in the store.
    Detached,
    /// Present in the store with no pending change.
    Unchanged,
    Added,
    Modified,
    Removed,
}

#[derive(Debug, Clone)]
pub(crate) enum Staged<T> {
    Added(T),
    Modified(T),
    Removed,
}

impl<T> Staged<T> {
    pub(crate) fn state(&self) -> EntityState {
        match self {
            Self::Added(_) => EntityState::Added,
            Self::Modified(_) => EntityState::Modified,
            Self::Removed => EntityState::Removed,
        }
    }
}

#[derive(Debug)]
pub(crate) struct EntitySet<T: Entity> {
    pub(crate) entries: BTreeMap<EntityKey, Staged<T>>,
}

impl<T: Entity> Default for EntitySet<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

/// Type-erased view used by `save_changes` to walk every set in one batch.
pub(crate) trait StagedSet {
    fn pending(&self) -> usize;
    fn validate(&self, errors: &mut Vec<FieldError>);
    fn flush(&self, conn: &Connection) -> rusqlite::Result<usize>;
    fn clear(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Entity> StagedSet for EntitySet<T> {
    fn pending(&self) -> usize {
        self.entries.len()
    }

    fn validate(&self, errors: &mut Vec<FieldError>) {
        for staged in self.entries.values() {
            if let Staged::Added(entity) | Staged::Modified(entity) = staged {
                errors.extend(entity.validate());
            }
        }
    }

    fn flush(&self, conn: &Connection) -> rusqlite::Result<usize> {
        let mut written = 0;

        let mut delete = conn.prepare_cached(&delete_sql::<T>())?;
        for (key, staged) in &self.entries {
            if let Staged::Removed = staged {
                written += delete.execute([*key])?;
            }
        }

        let mut update = conn.prepare_cached(&update_sql::<T>())?;
        for (key, staged) in &self.entries {
            if let Staged::Modified(entity) = staged {
                let mut values = entity.to_values();
                values.push(Value::Integer(*key));
                let changed = update.execute(params_from_iter(values))?;
                if changed == 0 {
                    // Row vanished underneath this context since it was read.
                    return Err(rusqlite::Error::QueryReturnedNoRows);
                }
                written += changed;
            }
        }

        let mut insert = conn.prepare_cached(&insert_sql::<T>())?;
        for (key, staged) in &self.entries {
            if let Staged::Added(entity) = staged {
                let mut values = vec![Value::Integer(*key)];
                values.extend(entity.to_values());
                written += insert.execute(params_from_iter(values))?;
            }
        }

        Ok(written)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn column_list<T: Entity>() -> String {
    std::iter::once(T::KEY_COLUMN)
        .chain(T::COLUMNS.iter().copied())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn select_all_sql<T: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {} ASC;",
        column_list::<T>(),
        T::TABLE,
        T::KEY_COLUMN
    )
}

pub(crate) fn select_one_sql<T: Entity>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?1;",
        column_list::<T>(),
        T::TABLE,
        T::KEY_COLUMN
    )
}

fn insert_sql<T: Entity>() -> String {
    let placeholders = (1..=T::COLUMNS.len() + 1)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders});",
        T::TABLE,
        column_list::<T>()
    )
}

fn update_sql<T: Entity>() -> String {
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {assignments} WHERE {} = ?{};",
        T::TABLE,
        T::KEY_COLUMN,
        T::COLUMNS.len() + 1
    )
}

fn delete_sql<T: Entity>() -> String {
    format!("DELETE FROM {} WHERE {} = ?1;", T::TABLE, T::KEY_COLUMN)
}
