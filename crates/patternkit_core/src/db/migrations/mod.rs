//! Staff schema migrations.
//!
//! # Invariants
//! - Script `n` of `STEPS` upgrades the schema from version `n` to `n + 1`.
//! - `PRAGMA user_version` always names the last script applied.
//! - A store is upgraded in one transaction or left as it was.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: [&str; 2] = [
    include_str!("0001_employees.sql"),
    include_str!("0002_departments.sql"),
];

/// Schema version a freshly migrated store reports.
pub const SCHEMA_VERSION: u32 = STEPS.len() as u32;

/// Brings the store up to `SCHEMA_VERSION`.
pub fn migrate(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    let pending = &STEPS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (offset, script) in pending.iter().enumerate() {
        tx.execute_batch(script)?;
        tx.pragma_update(None, "user_version", found + offset as u32 + 1)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={found} to_version={SCHEMA_VERSION}"
    );
    Ok(())
}

pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
