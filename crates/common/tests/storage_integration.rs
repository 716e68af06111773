//! Integration tests for the storage module
//!
//! Pool creation, concurrent writers, transactions and error classification
//! against real database files.

#![cfg(feature = "platform")]

use std::path::PathBuf;
use std::sync::Arc;

use fanevent_common::storage::{SqlitePool, SqlitePoolConfig, StorageError, StorageResult};
use tempfile::TempDir;

fn temp_db_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    (temp_dir, db_path)
}

fn test_pool(db_path: &std::path::Path) -> StorageResult<SqlitePool> {
    SqlitePool::new(db_path, SqlitePoolConfig::with_max_size(4))
}

#[test]
fn data_survives_pool_restart() {
    let (_dir, db_path) = temp_db_path();

    {
        let pool = test_pool(&db_path).unwrap();
        let conn = pool.get_connection().unwrap();
        conn.execute_batch("CREATE TABLE events (id TEXT PRIMARY KEY, title TEXT NOT NULL)")
            .unwrap();
        conn.execute("INSERT INTO events (id, title) VALUES (?1, ?2)", &[&"e1", &"Cosplay Meetup"])
            .unwrap();
    }

    let pool = test_pool(&db_path).unwrap();
    let conn = pool.get_connection().unwrap();
    let title: String = conn
        .query_row("SELECT title FROM events WHERE id = ?1", &[&"e1"], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "Cosplay Meetup");
}

#[test]
fn foreign_keys_are_enforced() {
    let (_dir, db_path) = temp_db_path();
    let pool = test_pool(&db_path).unwrap();
    let conn = pool.get_connection().unwrap();

    conn.execute_batch(
        "CREATE TABLE events (id TEXT PRIMARY KEY);
         CREATE TABLE rsvps (id TEXT PRIMARY KEY,
                             event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE);",
    )
    .unwrap();

    let result = conn.execute("INSERT INTO rsvps (id, event_id) VALUES ('r1', 'missing')", &[]);
    assert!(matches!(result, Err(StorageError::Rusqlite(_))));

    conn.execute("INSERT INTO events (id) VALUES ('e1')", &[]).unwrap();
    conn.execute("INSERT INTO rsvps (id, event_id) VALUES ('r1', 'e1')", &[]).unwrap();
    conn.execute("DELETE FROM events WHERE id = 'e1'", &[]).unwrap();

    let remaining: i64 =
        conn.query_row("SELECT COUNT(*) FROM rsvps", &[], |row| row.get(0)).unwrap();
    assert_eq!(remaining, 0, "ON DELETE CASCADE should remove dependent rows");
}

#[test]
fn committed_transaction_is_visible_to_other_connections() {
    let (_dir, db_path) = temp_db_path();
    let pool = Arc::new(test_pool(&db_path).unwrap());

    {
        let mut conn = pool.get_connection().unwrap();
        conn.execute_batch("CREATE TABLE likes (user_id TEXT, event_id TEXT, UNIQUE(user_id, event_id))")
            .unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO likes VALUES ('u1', 'e1')", []).unwrap();
        tx.execute("INSERT INTO likes VALUES ('u2', 'e1')", []).unwrap();
        tx.commit().unwrap();
    }

    let other = Arc::clone(&pool);
    let count = std::thread::spawn(move || {
        let conn = other.get_connection().unwrap();
        conn.query_row("SELECT COUNT(*) FROM likes", &[], |row| row.get::<_, i64>(0)).unwrap()
    })
    .join()
    .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn unique_violation_is_classified() {
    let (_dir, db_path) = temp_db_path();
    let pool = test_pool(&db_path).unwrap();
    let conn = pool.get_connection().unwrap();

    conn.execute_batch("CREATE TABLE likes (user_id TEXT, event_id TEXT, UNIQUE(user_id, event_id))")
        .unwrap();
    conn.execute("INSERT INTO likes VALUES ('u1', 'e1')", &[]).unwrap();

    let err = conn.execute("INSERT INTO likes VALUES ('u1', 'e1')", &[]).unwrap_err();
    assert!(err.is_unique_violation());
    assert!(!err.is_retryable());
}
