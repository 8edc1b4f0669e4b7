//! Entity model shared by repositories and the persistence context.
//!
//! # Responsibility
//! - Define the `Entity` contract that maps a record type onto one table.
//! - Define field-level validation errors reported on save.
//!
//! # Invariants
//! - Every entity is identified by a stable integer `EntityKey`.
//! - `Entity::COLUMNS` order matches `Entity::to_values` order.
//! - Entities reference each other by attribute value only, never by ownership.

pub mod department;
pub mod employee;

use rusqlite::types::Value;
use rusqlite::Row;
use std::fmt::{Debug, Display, Formatter};

/// Primary key shared by every entity table.
pub type EntityKey = i64;

/// Compile-time mapping of a record type onto its SQLite table.
///
/// Repositories and the persistence context are generic over this trait, so
/// each entity type gets its own monomorphized code path instead of a runtime
/// type map.
pub trait Entity: Clone + Debug + PartialEq + 'static {
    /// Short human-readable name used in errors and log events.
    const NAME: &'static str;
    const TABLE: &'static str;
    const KEY_COLUMN: &'static str;
    /// Non-key columns, in `to_values` order.
    const COLUMNS: &'static [&'static str];

    fn key(&self) -> EntityKey;

    /// Non-key column values, in `COLUMNS` order.
    fn to_values(&self) -> Vec<Value>;

    /// Decodes one row selected as `KEY_COLUMN, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Returns every field-level problem; empty means valid.
    fn validate(&self) -> Vec<FieldError>;
}

/// One field-level validation problem reported by the store on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub entity: &'static str,
    pub key: EntityKey,
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new<E: Entity>(entity: &E, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity: E::NAME,
            key: entity.key(),
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Property: {} Error: {}", self.field, self.message)
    }
}

pub(crate) fn require_text<E: Entity>(
    entity: &E,
    field: &'static str,
    value: &str,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(entity, field, format!("{field} is required")));
    } else if value.chars().count() > max_chars {
        errors.push(FieldError::new(
            entity,
            field,
            format!("{field} must be at most {max_chars} characters"),
        ));
    }
}

pub(crate) fn require_positive_key<E: Entity>(entity: &E, errors: &mut Vec<FieldError>) {
    if entity.key() <= 0 {
        errors.push(FieldError::new(
            entity,
            E::KEY_COLUMN,
            format!("{} must be positive", E::KEY_COLUMN),
        ));
    }
}
