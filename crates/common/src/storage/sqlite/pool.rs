//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling with per-connection pragmas.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, instrument, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};

/// SQLite connection pool
///
/// Manages a pool of SQLite connections using r2d2. Every connection gets
/// the configured pragmas applied when it is opened.
#[derive(Debug)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Create a new connection pool for the database file at `path`.
    ///
    /// A test connection is acquired before returning so that an unreadable
    /// file fails here instead of on first use.
    #[instrument(fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!("Creating SQLite connection pool");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        {
            let conn = pool.get().map_err(|e| {
                warn!("Failed to get test connection: {}", e);
                StorageError::Connection(format!("Failed to get test connection: {}", e))
            })?;
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            debug!("Test connection verified");
        }

        info!("SQLite pool created successfully with {} connections", config.max_size);

        Ok(Self { pool, config })
    }

    /// Get a connection from the pool.
    #[instrument(skip(self), fields(pool_size = self.config.max_size))]
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                debug!("Connection acquired in {}ms", start.elapsed().as_millis());
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();
                if err_str.contains("timed out") || err_str.contains("timeout") {
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {}", e)))
                }
            }
        }
    }

    /// Whether a connection can currently be checked out.
    pub fn is_healthy(&self) -> bool {
        self.pool.get().is_ok()
    }

    /// Maximum number of pooled connections.
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }
}
