//! Storage primitives for SQLite databases
//!
//! Provides an r2d2-backed connection pool, a thin connection wrapper and
//! the storage error type shared by the infrastructure crate.

pub mod error;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use sqlite::{
    apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig, SqliteStatement,
};
