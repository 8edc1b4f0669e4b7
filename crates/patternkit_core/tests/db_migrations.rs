use patternkit_core::db::migrations::{migrate, stored_version, SCHEMA_VERSION};
use patternkit_core::db::{open_db, open_db_in_memory, DbError};
use patternkit_core::{ContextError, PersistenceContext};
use rusqlite::Connection;

#[test]
fn in_memory_store_has_every_entity_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    assert_table_exists(&conn, "employees");
    assert_table_exists(&conn, "departments");
}

#[test]
fn reopening_a_file_keeps_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("staff.db");

    let first = open_db(&path).unwrap();
    first
        .execute(
            "INSERT INTO departments (department_id, name, location) VALUES (1, 'IT', NULL);",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), SCHEMA_VERSION);
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM departments;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 42);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = PersistenceContext::open(&patternkit_core::DatabaseLocation::File(path))
        .err()
        .unwrap();
    assert!(matches!(err, ContextError::Db(DbError::SchemaTooNew { .. })));
}

#[test]
fn department_names_are_unique() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO departments (department_id, name) VALUES (1, 'HR');",
        [],
    )
    .unwrap();
    let duplicate = conn.execute(
        "INSERT INTO departments (department_id, name) VALUES (2, 'HR');",
        [],
    );
    assert!(duplicate.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

#[test]
fn partially_migrated_store_runs_only_missing_steps() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_employees.sql"))
        .unwrap();
    conn.pragma_update(None, "user_version", 1).unwrap();

    migrate(&mut conn).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn, "departments");

    migrate(&mut conn).unwrap();
    assert_eq!(stored_version(&conn).unwrap(), SCHEMA_VERSION);
}
