//! Notification inbox repository implementation using SQLite
//!
//! Notifications carrying a dedup key are unique per user; inserting a
//! duplicate is a no-op reported as `false`.

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_core::notifications::ports::NotificationRepository as NotificationRepositoryPort;
use fanevent_domain::{Notification, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::rows::{
    bool_to_int, get_enum, get_ts, int_to_bool, map_join_error, map_storage_error, optional, to_ts,
};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, body, event_id, dedup_key, read, created_at";

/// SQLite-backed implementation of `NotificationRepository`
pub struct SqliteNotificationRepository {
    db: Arc<DbManager>,
}

impl SqliteNotificationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepositoryPort for SqliteNotificationRepository {
    async fn create(&self, notification: Notification) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 9] = [
                &notification.id,
                &notification.user_id,
                &notification.kind.as_str(),
                &notification.title,
                &notification.body,
                &notification.event_id,
                &notification.dedup_key,
                &bool_to_int(notification.read),
                &to_ts(notification.created_at),
            ];
            let inserted = conn
                .execute(
                    "INSERT INTO notifications (
                        id, user_id, kind, title, body, event_id, dedup_key, read, created_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                     ON CONFLICT(user_id, dedup_key) DO NOTHING",
                    params.as_slice(),
                )
                .map_err(map_storage_error)?;
            Ok(inserted > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Notification>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Notification>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?1"),
                params![&id],
                map_notification_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    /// Newest first
    async fn list(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: u32,
    ) -> DomainResult<Vec<Notification>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Notification>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {NOTIFICATION_COLUMNS} FROM notifications
                     WHERE user_id = ?1 AND (?2 = 0 OR read = 0)
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?3"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(
                params![&user_id, bool_to_int(unread_only), limit],
                map_notification_row,
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn unread_count(&self, user_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM notifications WHERE user_id = ?1 AND read = 0",
                params![&user_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_read(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("UPDATE notifications SET read = 1 WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_all_read(&self, user_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE notifications SET read = 1 WHERE user_id = ?1 AND read = 0",
                    params![&user_id],
                )
                .map_err(map_storage_error)?;
            Ok(u32::try_from(changed).unwrap_or(u32::MAX))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("DELETE FROM notifications WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_notification_row(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: get_enum(row, 2)?,
        title: row.get(3)?,
        body: row.get(4)?,
        event_id: row.get(5)?,
        dedup_key: row.get(6)?,
        read: int_to_bool(row.get(7)?),
        created_at: get_ts(row, 8)?,
    })
}
