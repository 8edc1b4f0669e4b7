//! Caller-facing repository and unit-of-work errors.

use crate::context::ContextError;
use crate::db::DbError;
use crate::model::{EntityKey, FieldError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    /// An absent entity was passed to a mutating operation, or its key clashes.
    InvalidArgument(String),
    NotFound {
        entity: &'static str,
        key: EntityKey,
    },
    /// Aggregated field-level errors reported by the store on save.
    ValidationFailed(ValidationFailure),
    /// Operation attempted outside its valid transaction or context state.
    InvalidState(String),
    Db(DbError),
    Disposed,
}

/// Composite validation error: one line per field error, original cause kept.
#[derive(Debug)]
pub struct ValidationFailure {
    message: String,
    cause: ContextError,
}

impl ValidationFailure {
    fn new(cause: ContextError) -> Self {
        Self {
            message: cause.to_string(),
            cause,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match &self.cause {
            ContextError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::ValidationFailed(failure) => write!(f, "{}", failure.message),
            Self::InvalidState(message) => write!(f, "invalid state: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Disposed => write!(f, "persistence context has been disposed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(failure) => Some(&failure.cause),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContextError> for RepoError {
    fn from(value: ContextError) -> Self {
        match value {
            ContextError::Db(err) => Self::Db(err),
            ContextError::Validation(_) => Self::ValidationFailed(ValidationFailure::new(value)),
            ContextError::DuplicateKey { .. } => Self::InvalidArgument(value.to_string()),
            ContextError::NotTracked { entity, key } => Self::NotFound { entity, key },
            ContextError::TableConflict(_) | ContextError::TransactionState(_) => {
                Self::InvalidState(value.to_string())
            }
            ContextError::Disposed => Self::Disposed,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}
