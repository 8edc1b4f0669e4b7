//! Employee entity.
//!
//! # Invariants
//! - `employee_id` is positive and never reused for another employee.
//! - `dept` names a department by value; there is no object link.
//! - `salary` is optional but never negative when present.

use super::{require_positive_key, require_text, Entity, EntityKey, FieldError};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

const MAX_NAME_CHARS: usize = 100;
const MAX_DEPT_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EntityKey,
    pub name: String,
    pub gender: String,
    pub salary: Option<i64>,
    pub dept: String,
}

impl Employee {
    pub fn new(
        employee_id: EntityKey,
        name: impl Into<String>,
        gender: impl Into<String>,
        dept: impl Into<String>,
    ) -> Self {
        Self {
            employee_id,
            name: name.into(),
            gender: gender.into(),
            salary: None,
            dept: dept.into(),
        }
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn set_dept(&mut self, dept: impl Into<String>) {
        self.dept = dept.into();
    }

    pub fn set_salary(&mut self, salary: Option<i64>) {
        self.salary = salary;
    }
}

impl Entity for Employee {
    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
    const KEY_COLUMN: &'static str = "employee_id";
    const COLUMNS: &'static [&'static str] = &["name", "gender", "salary", "dept"];

    fn key(&self) -> EntityKey {
        self.employee_id
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.gender.clone()),
            self.salary.map_or(Value::Null, Value::Integer),
            Value::Text(self.dept.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            employee_id: row.get("employee_id")?,
            name: row.get("name")?,
            gender: row.get("gender")?,
            salary: row.get("salary")?,
            dept: row.get("dept")?,
        })
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require_positive_key(self, &mut errors);
        require_text(self, "name", &self.name, MAX_NAME_CHARS, &mut errors);
        require_text(self, "dept", &self.dept, MAX_DEPT_CHARS, &mut errors);
        if let Some(salary) = self.salary {
            if salary < 0 {
                errors.push(FieldError::new(self, "salary", "salary cannot be negative"));
            }
        }
        errors
    }
}
