//! Aggregate queries backing the admin and organizer dashboards

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_common::storage::SqliteConnection;
use fanevent_core::dashboard::ports::DashboardRepository as DashboardRepositoryPort;
use fanevent_domain::{
    AdminDashboard, ModerationStatus, OrganizerEventStats, Result as DomainResult, Role,
    Rsvp, StatusCounts,
};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::rows::{get_enum, get_opt_ts, get_ts, map_join_error, map_storage_error, to_ts};

/// SQLite-backed implementation of `DashboardRepository`
pub struct SqliteDashboardRepository {
    db: Arc<DbManager>,
}

impl SqliteDashboardRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DashboardRepositoryPort for SqliteDashboardRepository {
    async fn admin_dashboard(&self, now: DateTime<Utc>) -> DomainResult<AdminDashboard> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<AdminDashboard> {
            let conn = db.get_connection()?;
            let mut dashboard = AdminDashboard::default();

            let mut stmt = conn
                .prepare("SELECT role, COUNT(*) FROM users GROUP BY role")
                .map_err(map_storage_error)?;
            let roles: Vec<(Role, u32)> = stmt
                .query_map(&[], |row| Ok((get_enum(row, 0)?, row.get(1)?)))
                .map_err(map_storage_error)?;
            for (role, count) in roles {
                match role {
                    Role::User => dashboard.users.users = count,
                    Role::Organizer => dashboard.users.organizers = count,
                    Role::Admin => dashboard.users.admins = count,
                }
            }

            dashboard.events = status_counts(&conn, "events")?;
            dashboard.groups = status_counts(&conn, "fan_groups")?;
            dashboard.pending_applications = count(
                &conn,
                "SELECT COUNT(*) FROM organizer_applications WHERE status = 'pending'",
                None,
            )?;
            dashboard.open_reports =
                count(&conn, "SELECT COUNT(*) FROM reports WHERE status = 'open'", None)?;
            dashboard.total_rsvps = count(&conn, "SELECT COUNT(*) FROM rsvps", None)?;
            dashboard.upcoming_events = count(
                &conn,
                "SELECT COUNT(*) FROM events WHERE status = 'approved' AND starts_at > ?1",
                Some(to_ts(now)),
            )?;

            Ok(dashboard)
        })
        .await
        .map_err(map_join_error)?
    }

    /// One row per event the organizer owns, soonest first
    async fn organizer_event_stats(
        &self,
        organizer_id: &str,
    ) -> DomainResult<Vec<OrganizerEventStats>> {
        let db = Arc::clone(&self.db);
        let organizer_id = organizer_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<OrganizerEventStats>> {
            let conn = db.get_connection()?;

            let mut stmt = conn
                .prepare(
                    "SELECT e.id, e.title, e.status, e.starts_at,
                            (SELECT COUNT(*) FROM rsvps r WHERE r.event_id = e.id),
                            (SELECT COUNT(*) FROM rsvps r
                             WHERE r.event_id = e.id AND r.checked_in_at IS NOT NULL),
                            (SELECT COUNT(*) FROM event_likes l WHERE l.event_id = e.id)
                     FROM events e
                     WHERE e.organizer_id = ?1
                     ORDER BY e.starts_at ASC",
                )
                .map_err(map_storage_error)?;
            let mut stats: Vec<OrganizerEventStats> = stmt
                .query_map(params![&organizer_id], |row| {
                    Ok(OrganizerEventStats {
                        event_id: row.get(0)?,
                        title: row.get(1)?,
                        status: get_enum(row, 2)?,
                        starts_at: get_ts(row, 3)?,
                        rsvp_count: row.get(4)?,
                        checked_in_count: row.get(5)?,
                        like_count: row.get(6)?,
                        attendance_hours: 0.0,
                    })
                })
                .map_err(map_storage_error)?;
            drop(stmt);

            let hours = attendance_hours_by_event(&conn, &organizer_id)?;
            for stat in &mut stats {
                stat.attendance_hours = hours.get(&stat.event_id).copied().unwrap_or(0.0);
            }
            Ok(stats)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn count(conn: &SqliteConnection, sql: &str, arg: Option<i64>) -> DomainResult<u32> {
    match arg {
        Some(arg) => conn.query_row(sql, params![arg], |row| row.get(0)),
        None => conn.query_row(sql, &[], |row| row.get(0)),
    }
    .map_err(map_storage_error)
}

fn status_counts(conn: &SqliteConnection, table: &str) -> DomainResult<StatusCounts> {
    let mut stmt = conn
        .prepare(&format!("SELECT status, COUNT(*) FROM {table} GROUP BY status"))
        .map_err(map_storage_error)?;
    let rows: Vec<(ModerationStatus, u32)> = stmt
        .query_map(&[], |row| Ok((get_enum(row, 0)?, row.get(1)?)))
        .map_err(map_storage_error)?;

    let mut counts = StatusCounts::default();
    for (status, count) in rows {
        match status {
            ModerationStatus::Pending => counts.pending = count,
            ModerationStatus::Approved => counts.approved = count,
            ModerationStatus::Rejected => counts.rejected = count,
        }
    }
    Ok(counts)
}

/// Sum of per-RSVP attended hours, keyed by event. Each RSVP is rounded on
/// its own so the totals match the attendee sheet.
fn attendance_hours_by_event(
    conn: &SqliteConnection,
    organizer_id: &str,
) -> DomainResult<HashMap<String, f64>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.id, r.event_id, r.user_id, r.created_at, r.checked_in_at, r.checked_out_at
             FROM rsvps r JOIN events e ON e.id = r.event_id
             WHERE e.organizer_id = ?1
               AND r.checked_in_at IS NOT NULL AND r.checked_out_at IS NOT NULL",
        )
        .map_err(map_storage_error)?;
    let rsvps: Vec<Rsvp> = stmt
        .query_map(params![organizer_id], |row| {
            Ok(Rsvp {
                id: row.get(0)?,
                event_id: row.get(1)?,
                user_id: row.get(2)?,
                created_at: get_ts(row, 3)?,
                checked_in_at: get_opt_ts(row, 4)?,
                checked_out_at: get_opt_ts(row, 5)?,
            })
        })
        .map_err(map_storage_error)?;

    let mut totals: HashMap<String, f64> = HashMap::new();
    for rsvp in rsvps {
        if let Some(hours) = rsvp.hours() {
            *totals.entry(rsvp.event_id).or_insert(0.0) += hours;
        }
    }
    Ok(totals)
}
