//! SQLite store bootstrap.
//!
//! Every connection handed to a persistence context comes from `open_store`:
//! foreign keys on, a busy timeout set, and the staff schema migrated to
//! `migrations::SCHEMA_VERSION`.

use crate::config::DatabaseLocation;
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a later schema.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => {
                write!(f, "store schema v{found} is newer than this build (v{supported})")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Opens the store a configuration points at.
pub fn open_store(location: &DatabaseLocation) -> DbResult<Connection> {
    match location {
        DatabaseLocation::Memory => open_db_in_memory(),
        DatabaseLocation::File(path) => open_db(path),
    }
}

pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    prepare("file", Connection::open(path))
}

/// Private store; it vanishes with the connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    prepare("memory", Connection::open_in_memory())
}

fn prepare(mode: &'static str, opened: rusqlite::Result<Connection>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = opened.map_err(DbError::from).and_then(|mut conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::migrate(&mut conn)?;
        Ok(conn)
    });

    let elapsed = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={elapsed}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={elapsed} error={err}"
        ),
    }
    result
}
