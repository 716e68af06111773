//! Event repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_common::storage::{SqliteConnection, StorageError};
use fanevent_core::events::ports::EventRepository as EventRepositoryPort;
use fanevent_domain::{Event, ModerationStatus, Result as DomainResult};
use rusqlite::types::Value;
use rusqlite::{params, Row, ToSql};
use tokio::task;
use tracing::debug;

use super::manager::DbManager;
use super::rows::{
    get_enum, get_opt_ts, get_ts, map_join_error, map_storage_error, opt_ts, optional, to_ts,
};

pub(crate) const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.location, e.category, \
     e.starts_at, e.ends_at, e.capacity, e.image_url, e.organizer_id, e.group_id, e.status, \
     e.moderation_note, e.created_at, e.updated_at";

/// SQLite-backed implementation of `EventRepository`
pub struct SqliteEventRepository {
    db: Arc<DbManager>,
}

impl SqliteEventRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    async fn query_events(
        &self,
        filter: &'static str,
        args: Vec<Value>,
    ) -> DomainResult<Vec<Event>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Event>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {EVENT_COLUMNS} FROM events e {filter}");
            let params: Vec<&dyn ToSql> = args.iter().map(|arg| arg as &dyn ToSql).collect();
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(params.as_slice(), map_event_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl EventRepositoryPort for SqliteEventRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Event>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Event>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = ?1"),
                params![&id],
                map_event_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, event: Event) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_event(&conn, &event).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, event: Event) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_event(&conn, &event).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// RSVPs, likes and reminders go with the event through cascading keys.
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("DELETE FROM events WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            debug!(event_id = %id, deleted = changed > 0, "Deleted event");
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_status(&self, status: ModerationStatus) -> DomainResult<Vec<Event>> {
        self.query_events(
            "WHERE e.status = ?1 ORDER BY e.starts_at ASC",
            vec![Value::from(status.as_str().to_string())],
        )
        .await
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<Event>> {
        self.query_events(
            "WHERE e.organizer_id = ?1 ORDER BY e.starts_at ASC",
            vec![Value::from(organizer_id.to_string())],
        )
        .await
    }

    async fn list_by_group(&self, group_id: &str) -> DomainResult<Vec<Event>> {
        self.query_events(
            "WHERE e.group_id = ?1 ORDER BY e.starts_at ASC",
            vec![Value::from(group_id.to_string())],
        )
        .await
    }

    async fn list_approved_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        self.query_events(
            "WHERE e.status = 'approved' AND e.starts_at > ?1 AND e.starts_at <= ?2
             ORDER BY e.starts_at ASC",
            vec![Value::Integer(to_ts(from)), Value::Integer(to_ts(to))],
        )
        .await
    }

    async fn list_all(&self) -> DomainResult<Vec<Event>> {
        self.query_events("ORDER BY e.created_at ASC, e.id ASC", Vec::new()).await
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row selected with [`EVENT_COLUMNS`]
pub(crate) fn map_event_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        category: row.get(4)?,
        starts_at: get_ts(row, 5)?,
        ends_at: get_opt_ts(row, 6)?,
        capacity: row.get(7)?,
        image_url: row.get(8)?,
        organizer_id: row.get(9)?,
        group_id: row.get(10)?,
        status: get_enum(row, 11)?,
        moderation_note: row.get(12)?,
        created_at: get_ts(row, 13)?,
        updated_at: get_ts(row, 14)?,
    })
}

fn insert_event(conn: &SqliteConnection, event: &Event) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 15] = [
        &event.id,
        &event.title,
        &event.description,
        &event.location,
        &event.category,
        &to_ts(event.starts_at),
        &opt_ts(event.ends_at),
        &event.capacity,
        &event.image_url,
        &event.organizer_id,
        &event.group_id,
        &event.status.as_str(),
        &event.moderation_note,
        &to_ts(event.created_at),
        &to_ts(event.updated_at),
    ];

    conn.execute(
        "INSERT INTO events (
            id, title, description, location, category, starts_at, ends_at, capacity,
            image_url, organizer_id, group_id, status, moderation_note, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params.as_slice(),
    )?;

    Ok(())
}

fn update_event(conn: &SqliteConnection, event: &Event) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 14] = [
        &event.title,
        &event.description,
        &event.location,
        &event.category,
        &to_ts(event.starts_at),
        &opt_ts(event.ends_at),
        &event.capacity,
        &event.image_url,
        &event.organizer_id,
        &event.group_id,
        &event.status.as_str(),
        &event.moderation_note,
        &to_ts(event.updated_at),
        &event.id, // WHERE clause
    ];

    let changed = conn.execute(
        "UPDATE events SET
            title = ?1, description = ?2, location = ?3, category = ?4, starts_at = ?5,
            ends_at = ?6, capacity = ?7, image_url = ?8, organizer_id = ?9, group_id = ?10,
            status = ?11, moderation_note = ?12, updated_at = ?13
         WHERE id = ?14",
        params.as_slice(),
    )?;
    if changed == 0 {
        return Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows));
    }

    Ok(())
}
