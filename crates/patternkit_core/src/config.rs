//! Runtime configuration for stores and logging.
//!
//! # Responsibility
//! - Describe where the persistence context keeps its data.
//! - Carry logging bootstrap parameters to `logging::init_logging`.
//!
//! # Invariants
//! - Missing values fall back to `CoreConfig::default()`.
//! - `log_level` defaults by build mode (see `default_log_level`).

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB: &str = "PATTERNKIT_DB";
pub const ENV_LOG_LEVEL: &str = "PATTERNKIT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PATTERNKIT_LOG_DIR";

/// Location of the SQLite store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseLocation {
    /// Private in-memory database, gone when the context is disposed.
    #[default]
    Memory,
    /// File-backed database shared across contexts.
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parses `:memory:` (or empty) as in-memory, everything else as a path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ":memory:" {
            Self::Memory
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

/// Top-level configuration consumed by the CLI and persistence bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub database: DatabaseLocation,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "invalid config `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from a JSON file. Absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds configuration from `PATTERNKIT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(db) = lookup(ENV_DB) {
            config.database = DatabaseLocation::parse(&db);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|value| !value.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir.trim()));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DatabaseLocation, ENV_DB, ENV_LOG_DIR};
    use std::path::PathBuf;

    #[test]
    fn parse_treats_memory_marker_and_blank_as_memory() {
        assert_eq!(DatabaseLocation::parse(":memory:"), DatabaseLocation::Memory);
        assert_eq!(DatabaseLocation::parse("  "), DatabaseLocation::Memory);
        assert_eq!(
            DatabaseLocation::parse("/tmp/staff.db"),
            DatabaseLocation::File(PathBuf::from("/tmp/staff.db"))
        );
    }

    #[test]
    fn lookup_overrides_only_present_keys() {
        let config = CoreConfig::from_lookup(|key| match key {
            ENV_DB => Some("/var/lib/staff.db".to_string()),
            ENV_LOG_DIR => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/var/lib/staff.db"))
        );
        assert_eq!(config.log_level, CoreConfig::default().log_level);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn json_config_fills_missing_fields_with_defaults() {
        let config: CoreConfig =
            serde_json::from_str(r#"{ "database": { "file": "/data/staff.db" } }"#).unwrap();
        assert_eq!(
            config.database,
            DatabaseLocation::File(PathBuf::from("/data/staff.db"))
        );
        assert_eq!(config.log_dir, None);

        let memory: CoreConfig = serde_json::from_str(r#"{ "database": "memory" }"#).unwrap();
        assert_eq!(memory.database, DatabaseLocation::Memory);
    }

    #[test]
    fn from_json_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
