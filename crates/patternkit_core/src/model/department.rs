//! Department entity.

use super::{require_positive_key, require_text, Entity, EntityKey, FieldError};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

const MAX_NAME_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: EntityKey,
    pub name: String,
    pub location: Option<String>,
}

impl Department {
    pub fn new(department_id: EntityKey, name: impl Into<String>) -> Self {
        Self {
            department_id,
            name: name.into(),
            location: None,
        }
    }

    pub fn located_at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl Entity for Department {
    const NAME: &'static str = "department";
    const TABLE: &'static str = "departments";
    const KEY_COLUMN: &'static str = "department_id";
    const COLUMNS: &'static [&'static str] = &["name", "location"];

    fn key(&self) -> EntityKey {
        self.department_id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            self.location.clone().map_or(Value::Null, Value::Text),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            department_id: row.get("department_id")?,
            name: row.get("name")?,
            location: row.get("location")?,
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_positive_key(self, &mut errors);
        require_text(self, "name", &self.name, MAX_NAME_CHARS, &mut errors);
        if matches!(self.location.as_deref(), Some(location) if location.trim().is_empty()) {
            errors.push(FieldError::new(
                self,
                "location",
                "location must be omitted rather than blank",
            ));
        }
        errors
    }
}
