//! Adapters between incompatible interfaces.
//!
//! # Responsibility
//! - `EmployeeAdapter`: turn HR string rows into billing records and hand
//!   them to the third-party billing system.
//! - `Translator`: relay questions between an English and a French speaker.
//!
//! # Invariants
//! - Row conversion is all-or-nothing: one bad row rejects the whole batch
//!   before billing runs.
//! - Phrases missing from the dictionaries are errors, not empty replies.

use log::{debug, info};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ROW_COLUMNS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Row `row` does not have exactly id, name, designation and salary.
    ColumnCount { row: usize, found: usize },
    InvalidId { row: usize, value: String },
    InvalidSalary { row: usize, value: String },
    UnknownPhrase { language: Language, phrase: String },
    NoAnswer { phrase: String },
}

impl Display for AdapterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { row, found } => {
                write!(f, "row {row}: expected {ROW_COLUMNS} columns, found {found}")
            }
            Self::InvalidId { row, value } => write!(f, "row {row}: invalid id `{value}`"),
            Self::InvalidSalary { row, value } => {
                write!(f, "row {row}: invalid salary `{value}`")
            }
            Self::UnknownPhrase { language, phrase } => {
                write!(f, "no {language} translation for `{phrase}`")
            }
            Self::NoAnswer { phrase } => write!(f, "no answer for `{phrase}`"),
        }
    }
}

impl Error for AdapterError {}

/// Record shape the billing system understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingEmployee {
    pub id: i32,
    pub name: String,
    pub designation: String,
    pub salary: Decimal,
}

/// Adaptee: accepts only typed billing records.
#[derive(Debug, Default)]
pub struct ThirdPartyBillingSystem;

impl ThirdPartyBillingSystem {
    /// Credits each salary; returns one confirmation line per employee.
    pub fn process_salary(&self, employees: &[BillingEmployee]) -> Vec<String> {
        employees
            .iter()
            .map(|employee| {
                let line = format!(
                    "Rs.{} Salary Credited to {} Account",
                    employee.salary, employee.name
                );
                debug!("event=billing_credit module=adapter status=ok id={}", employee.id);
                line
            })
            .collect()
    }
}

/// Target interface seen by the HR client.
pub trait SalaryProcessor {
    fn process_company_salary(&self, rows: &[&[&str]]) -> Result<Vec<String>, AdapterError>;
}

/// Object adapter: owns the billing system and converts rows for it.
#[derive(Debug, Default)]
pub struct EmployeeAdapter {
    billing: ThirdPartyBillingSystem,
}

impl EmployeeAdapter {
    pub fn new(billing: ThirdPartyBillingSystem) -> Self {
        Self { billing }
    }

    /// Converts `[id, name, designation, salary]` rows.
    pub fn convert_rows(rows: &[&[&str]]) -> Result<Vec<BillingEmployee>, AdapterError> {
        rows.iter()
            .enumerate()
            .map(|(row, columns)| convert_row(row, columns))
            .collect()
    }
}

impl SalaryProcessor for EmployeeAdapter {
    fn process_company_salary(&self, rows: &[&[&str]]) -> Result<Vec<String>, AdapterError> {
        let employees = Self::convert_rows(rows)?;
        info!(
            "event=adapter_convert module=adapter status=ok rows={}",
            employees.len()
        );
        Ok(self.billing.process_salary(&employees))
    }
}

fn convert_row(row: usize, columns: &[&str]) -> Result<BillingEmployee, AdapterError> {
    let [id, name, designation, salary] = columns else {
        return Err(AdapterError::ColumnCount {
            row,
            found: columns.len(),
        });
    };
    let id = id.trim().parse::<i32>().map_err(|_| AdapterError::InvalidId {
        row,
        value: id.to_string(),
    })?;
    let salary = Decimal::from_str(salary.trim()).map_err(|_| AdapterError::InvalidSalary {
        row,
        value: salary.to_string(),
    })?;
    Ok(BillingEmployee {
        id,
        name: name.to_string(),
        designation: designation.to_string(),
        salary,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English => write!(f, "English"),
            Self::French => write!(f, "French"),
        }
    }
}

pub trait EnglishSpeaker {
    fn answer_in_english(&self, question: &str) -> Option<String>;
}

pub trait FrenchSpeaker {
    fn answer_in_french(&self, question: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct John;

#[derive(Debug, Default)]
pub struct David;

impl EnglishSpeaker for John {
    fn answer_in_english(&self, question: &str) -> Option<String> {
        question
            .eq_ignore_ascii_case("where are you?")
            .then(|| "I am in USA".to_string())
    }
}

impl FrenchSpeaker for David {
    fn answer_in_french(&self, question: &str) -> Option<String> {
        question
            .eq_ignore_ascii_case("comment allez-vous?")
            .then(|| "Je suis très bien".to_string())
    }
}

/// Relays a question to the speaker of the other language and translates
/// the reply back.
pub struct Translator<E: EnglishSpeaker, F: FrenchSpeaker> {
    english: E,
    french: F,
    english_to_french: HashMap<&'static str, &'static str>,
    french_to_english: HashMap<&'static str, &'static str>,
}

impl Default for Translator<John, David> {
    fn default() -> Self {
        Self::new(John, David)
    }
}

impl<E: EnglishSpeaker, F: FrenchSpeaker> Translator<E, F> {
    pub fn new(english: E, french: F) -> Self {
        Self {
            english,
            french,
            english_to_french: HashMap::from([
                ("how are you?", "comment allez-vous?"),
                ("I am in USA", "Je suis aux Etats-Unis"),
            ]),
            french_to_english: HashMap::from([
                ("Je suis très bien", "I am fine"),
                ("où êtes-vous?", "where are you?"),
            ]),
        }
    }

    /// Asks the French speaker an English question; the reply comes back in English.
    pub fn ask_french_speaker(&self, english_question: &str) -> Result<String, AdapterError> {
        let question = self.translate(english_question, Language::French)?;
        let reply = self
            .french
            .answer_in_french(&question)
            .ok_or_else(|| AdapterError::NoAnswer { phrase: question })?;
        self.translate(&reply, Language::English)
    }

    /// Asks the English speaker a French question; the reply comes back in French.
    pub fn ask_english_speaker(&self, french_question: &str) -> Result<String, AdapterError> {
        let question = self.translate(french_question, Language::English)?;
        let reply = self
            .english
            .answer_in_english(&question)
            .ok_or_else(|| AdapterError::NoAnswer { phrase: question })?;
        self.translate(&reply, Language::French)
    }

    pub fn translate(&self, words: &str, into: Language) -> Result<String, AdapterError> {
        let dictionary = match into {
            Language::French => &self.english_to_french,
            Language::English => &self.french_to_english,
        };
        dictionary
            .get(words)
            .map(|translated| (*translated).to_string())
            .ok_or_else(|| AdapterError::UnknownPhrase {
                language: into,
                phrase: words.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{AdapterError, EmployeeAdapter, Language, SalaryProcessor, Translator};
    use rust_decimal::Decimal;

    #[test]
    fn adapter_converts_rows_and_credits_salaries() {
        let rows: [&[&str]; 2] = [&["101", "John", "SE", "10000"], &["103", "Dev", "SSE", "30000.50"]];
        let lines = EmployeeAdapter::default().process_company_salary(&rows).unwrap();

        assert_eq!(
            lines,
            vec![
                "Rs.10000 Salary Credited to John Account",
                "Rs.30000.50 Salary Credited to Dev Account",
            ]
        );
        let converted = EmployeeAdapter::convert_rows(&rows).unwrap();
        assert_eq!(converted[1].salary, Decimal::new(3_000_050, 2));
        assert_eq!(converted[1].designation, "SSE");
    }

    #[test]
    fn bad_row_rejects_the_batch() {
        let rows: [&[&str]; 2] = [&["101", "John", "SE", "10000"], &["x", "Smith", "SE", "20000"]];
        assert_eq!(
            EmployeeAdapter::default().process_company_salary(&rows),
            Err(AdapterError::InvalidId {
                row: 1,
                value: "x".to_string()
            })
        );

        let short: [&[&str]; 1] = [&["102", "Smith"]];
        assert!(matches!(
            EmployeeAdapter::convert_rows(&short),
            Err(AdapterError::ColumnCount { row: 0, found: 2 })
        ));
    }

    #[test]
    fn translator_relays_both_directions() {
        let translator = Translator::default();
        assert_eq!(translator.ask_french_speaker("how are you?").unwrap(), "I am fine");
        assert_eq!(
            translator.ask_english_speaker("où êtes-vous?").unwrap(),
            "Je suis aux Etats-Unis"
        );
        assert!(matches!(
            translator.translate("good night", Language::French),
            Err(AdapterError::UnknownPhrase { .. })
        ));
    }
}
