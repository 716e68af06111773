//! Event like repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fanevent_core::likes::ports::LikeRepository as LikeRepositoryPort;
use fanevent_domain::{Event, Result as DomainResult};
use rusqlite::{params, TransactionBehavior};
use tokio::task;

use super::event_repository::{map_event_row, EVENT_COLUMNS};
use super::manager::DbManager;
use super::rows::{map_join_error, map_sql_error, map_storage_error, to_ts};

/// SQLite-backed implementation of `LikeRepository`
pub struct SqliteLikeRepository {
    db: Arc<DbManager>,
}

impl SqliteLikeRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepositoryPort for SqliteLikeRepository {
    /// Flip the like; returns whether the event is liked afterwards.
    async fn toggle(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (event_id, user_id) = (event_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let removed = tx
                .execute(
                    "DELETE FROM event_likes WHERE event_id = ?1 AND user_id = ?2",
                    params![&event_id, &user_id],
                )
                .map_err(map_sql_error)?;
            if removed == 0 {
                tx.execute(
                    "INSERT INTO event_likes (event_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                    params![&event_id, &user_id, to_ts(Utc::now())],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;

            Ok(removed == 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self, event_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM event_likes WHERE event_id = ?1",
                params![&event_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn is_liked(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (event_id, user_id) = (event_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM event_likes WHERE event_id = ?1 AND user_id = ?2)",
                params![&event_id, &user_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Most recently liked first
    async fn liked_events(&self, user_id: &str) -> DomainResult<Vec<Event>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Event>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {EVENT_COLUMNS}
                     FROM event_likes l JOIN events e ON e.id = l.event_id
                     WHERE l.user_id = ?1
                     ORDER BY l.created_at DESC, l.rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&user_id], map_event_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}
