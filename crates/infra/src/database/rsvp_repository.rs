//! RSVP and attendance repository implementation using SQLite
//!
//! RSVP creation runs in an immediate transaction so the duplicate and
//! capacity checks see a stable view of the event's RSVP rows.

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_core::attendance::ports::{RsvpOutcome, RsvpRepository as RsvpRepositoryPort};
use fanevent_domain::{AttendanceRecord, Attendee, Result as DomainResult, Rsvp};
use rusqlite::{params, Row, TransactionBehavior};
use tokio::task;
use tracing::debug;

use super::manager::DbManager;
use super::rows::{
    get_opt_ts, get_ts, map_join_error, map_sql_error, map_storage_error, opt_ts, optional, to_ts,
};
use super::user_repository::{map_user_row, USER_COLUMNS};

const RSVP_COLUMNS: &str =
    "r.id, r.event_id, r.user_id, r.created_at, r.checked_in_at, r.checked_out_at";

/// SQLite-backed implementation of `RsvpRepository`
pub struct SqliteRsvpRepository {
    db: Arc<DbManager>,
}

impl SqliteRsvpRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RsvpRepositoryPort for SqliteRsvpRepository {
    async fn get(&self, event_id: &str, user_id: &str) -> DomainResult<Option<Rsvp>> {
        let db = Arc::clone(&self.db);
        let (event_id, user_id) = (event_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<Option<Rsvp>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!(
                    "SELECT {RSVP_COLUMNS} FROM rsvps r WHERE r.event_id = ?1 AND r.user_id = ?2"
                ),
                params![&event_id, &user_id],
                map_rsvp_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, rsvp: Rsvp, capacity: Option<u32>) -> DomainResult<RsvpOutcome> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<RsvpOutcome> {
            let mut conn = db.get_connection()?;
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(map_sql_error)?;

            let exists: bool = tx
                .query_row(
                    "SELECT EXISTS (SELECT 1 FROM rsvps WHERE event_id = ?1 AND user_id = ?2)",
                    params![&rsvp.event_id, &rsvp.user_id],
                    |row| row.get(0),
                )
                .map_err(map_sql_error)?;
            if exists {
                return Ok(RsvpOutcome::AlreadyExists);
            }

            if let Some(capacity) = capacity {
                let taken: u32 = tx
                    .query_row(
                        "SELECT COUNT(*) FROM rsvps WHERE event_id = ?1",
                        params![&rsvp.event_id],
                        |row| row.get(0),
                    )
                    .map_err(map_sql_error)?;
                if taken >= capacity {
                    debug!(event_id = %rsvp.event_id, capacity, "Event is full");
                    return Ok(RsvpOutcome::Full);
                }
            }

            tx.execute(
                "INSERT INTO rsvps (id, event_id, user_id, created_at, checked_in_at, checked_out_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &rsvp.id,
                    &rsvp.event_id,
                    &rsvp.user_id,
                    to_ts(rsvp.created_at),
                    opt_ts(rsvp.checked_in_at),
                    opt_ts(rsvp.checked_out_at),
                ],
            )
            .map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;

            Ok(RsvpOutcome::Created)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Only the check-in columns change after creation.
    async fn update(&self, rsvp: Rsvp) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE rsvps SET checked_in_at = ?1, checked_out_at = ?2 WHERE id = ?3",
                    params![opt_ts(rsvp.checked_in_at), opt_ts(rsvp.checked_out_at), &rsvp.id],
                )
                .map_err(map_storage_error)?;
            if changed == 0 {
                return Err(fanevent_domain::FanEventError::not_found("rsvp", &rsvp.id));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (event_id, user_id) = (event_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "DELETE FROM rsvps WHERE event_id = ?1 AND user_id = ?2",
                    params![&event_id, &user_id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_for_event(&self, event_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM rsvps WHERE event_id = ?1",
                params![&event_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_checked_in(&self, event_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM rsvps WHERE event_id = ?1 AND checked_in_at IS NOT NULL",
                params![&event_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Rsvp>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Rsvp>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {RSVP_COLUMNS} FROM rsvps r
                     WHERE r.user_id = ?1 ORDER BY r.created_at DESC, r.rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&user_id], map_rsvp_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn attendees(&self, event_id: &str) -> DomainResult<Vec<Attendee>> {
        let db = Arc::clone(&self.db);
        let event_id = event_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Attendee>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {RSVP_COLUMNS}, {USER_COLUMNS}
                     FROM rsvps r JOIN users u ON u.id = r.user_id
                     WHERE r.event_id = ?1
                     ORDER BY r.created_at ASC, r.rowid ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&event_id], |row| {
                let rsvp = map_rsvp_row(row)?;
                let user = map_user_row(row, 6)?;
                Ok(Attendee {
                    hours: rsvp.hours(),
                    rsvp,
                    display_name: user.public_name().to_string(),
                    email: user.email,
                })
            })
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn attendance_for_user(&self, user_id: &str) -> DomainResult<Vec<AttendanceRecord>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<AttendanceRecord>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {RSVP_COLUMNS}, e.title
                     FROM rsvps r JOIN events e ON e.id = r.event_id
                     WHERE r.user_id = ?1 AND r.checked_in_at IS NOT NULL
                     ORDER BY r.checked_in_at DESC"
                ))
                .map_err(map_storage_error)?;
            let rows: Vec<(Rsvp, String)> = stmt
                .query_map(params![&user_id], |row| Ok((map_rsvp_row(row)?, row.get(6)?)))
                .map_err(map_storage_error)?;

            Ok(rows
                .into_iter()
                .filter_map(|(rsvp, event_title)| {
                    let checked_in_at = rsvp.checked_in_at?;
                    Some(AttendanceRecord {
                        hours: rsvp.hours(),
                        event_id: rsvp.event_id,
                        event_title,
                        checked_in_at,
                        checked_out_at: rsvp.checked_out_at,
                    })
                })
                .collect())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_rsvp_row(row: &Row<'_>) -> rusqlite::Result<Rsvp> {
    Ok(Rsvp {
        id: row.get(0)?,
        event_id: row.get(1)?,
        user_id: row.get(2)?,
        created_at: get_ts(row, 3)?,
        checked_in_at: get_opt_ts(row, 4)?,
        checked_out_at: get_opt_ts(row, 5)?,
    })
}
