//! Event reminder repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_core::reminders::ports::ReminderRepository as ReminderRepositoryPort;
use fanevent_domain::{EventReminder, Result as DomainResult};
use rusqlite::{params, Row};
use tokio::task;
use tracing::debug;

use super::manager::DbManager;
use super::rows::{get_ts, map_join_error, map_sql_error, map_storage_error, optional, to_ts};

const REMINDER_COLUMNS: &str = "id, user_id, event_id, offset_minutes, created_at";

/// SQLite-backed implementation of `ReminderRepository`
pub struct SqliteReminderRepository {
    db: Arc<DbManager>,
}

impl SqliteReminderRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReminderRepositoryPort for SqliteReminderRepository {
    /// Swap the user's offsets for one event in a single transaction.
    async fn replace_for_event(
        &self,
        user_id: &str,
        event_id: &str,
        reminders: Vec<EventReminder>,
    ) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let (user_id, event_id) = (user_id.to_string(), event_id.to_string());

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;

            let removed = tx
                .execute(
                    "DELETE FROM event_reminders WHERE user_id = ?1 AND event_id = ?2",
                    params![&user_id, &event_id],
                )
                .map_err(map_sql_error)?;
            for reminder in &reminders {
                tx.execute(
                    "INSERT INTO event_reminders (id, user_id, event_id, offset_minutes, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        &reminder.id,
                        &reminder.user_id,
                        &reminder.event_id,
                        reminder.offset_minutes,
                        to_ts(reminder.created_at),
                    ],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;

            debug!(%event_id, removed, inserted = reminders.len(), "Replaced reminders");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: &str) -> DomainResult<Option<EventReminder>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<EventReminder>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {REMINDER_COLUMNS} FROM event_reminders WHERE id = ?1"),
                params![&id],
                map_reminder_row,
            ))
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
                .execute("DELETE FROM event_reminders WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<EventReminder>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<EventReminder>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {REMINDER_COLUMNS} FROM event_reminders
                     WHERE user_id = ?1 ORDER BY event_id ASC, offset_minutes ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&user_id], map_reminder_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_event(&self, event_id: &str) -> DomainResult<Vec<EventReminder>> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<EventReminder>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {REMINDER_COLUMNS} FROM event_reminders
                     WHERE event_id = ?1 ORDER BY offset_minutes DESC, user_id ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&event_id], map_reminder_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_reminder_row(row: &Row<'_>) -> rusqlite::Result<EventReminder> {
    Ok(EventReminder {
        id: row.get(0)?,
        user_id: row.get(1)?,
        event_id: row.get(2)?,
        offset_minutes: row.get(3)?,
        created_at: get_ts(row, 4)?,
    })
}
