//! Fluent interface for assembling an employee profile.
//!
//! # Invariants
//! - Every chain step consumes and returns the builder.
//! - The first failing step is remembered and reported by `finish`; later
//!   steps do not overwrite it.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

const BIRTH_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeProfile {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub department: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FluentError {
    InvalidDate { input: String, reason: String },
    MissingField(&'static str),
}

impl Display for FluentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { input, reason } => {
                write!(f, "invalid date of birth `{input}` (expected MM/DD/YYYY): {reason}")
            }
            Self::MissingField(field) => write!(f, "{field} was never set"),
        }
    }
}

impl Error for FluentError {}

#[derive(Debug, Default)]
pub struct FluentEmployee {
    full_name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    department: Option<String>,
    address: Option<String>,
    error: Option<FluentError>,
}

impl FluentEmployee {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_of_the_employee(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Accepts `MM/DD/YYYY`.
    pub fn born(mut self, date_of_birth: &str) -> Self {
        match NaiveDate::parse_from_str(date_of_birth.trim(), BIRTH_DATE_FORMAT) {
            Ok(date) => self.date_of_birth = Some(date),
            Err(err) => {
                self.error.get_or_insert(FluentError::InvalidDate {
                    input: date_of_birth.to_string(),
                    reason: err.to_string(),
                });
            }
        }
        self
    }

    pub fn working_on(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn stays_at(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn finish(self) -> Result<EmployeeProfile, FluentError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(EmployeeProfile {
            full_name: self.full_name.ok_or(FluentError::MissingField("full_name"))?,
            date_of_birth: self
                .date_of_birth
                .ok_or(FluentError::MissingField("date_of_birth"))?,
            department: self.department.ok_or(FluentError::MissingField("department"))?,
            address: self.address.ok_or(FluentError::MissingField("address"))?,
        })
    }
}
