//! Content report repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_common::storage::{SqliteConnection, StorageError};
use fanevent_core::reports::ports::ReportRepository as ReportRepositoryPort;
use fanevent_domain::{Report, ReportStatus, ReportTargetKind, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::rows::{
    get_enum, get_opt_ts, get_ts, map_join_error, map_storage_error, opt_ts, optional, to_ts,
};

const REPORT_COLUMNS: &str = "id, reporter_id, target_kind, target_id, reason, status, \
     resolver_id, resolution_note, created_at, resolved_at";

/// SQLite-backed implementation of `ReportRepository`
pub struct SqliteReportRepository {
    db: Arc<DbManager>,
}

impl SqliteReportRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepositoryPort for SqliteReportRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Report>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Report>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
                params![&id],
                map_report_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, report: Report) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_report(&conn, &report).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, report: Report) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 5] = [
                &report.status.as_str(),
                &report.resolver_id,
                &report.resolution_note,
                &opt_ts(report.resolved_at),
                &report.id,
            ];
            let changed = conn
                .execute(
                    "UPDATE reports SET
                        status = ?1, resolver_id = ?2, resolution_note = ?3, resolved_at = ?4
                     WHERE id = ?5",
                    params.as_slice(),
                )
                .map_err(map_storage_error)?;
            if changed == 0 {
                return Err(fanevent_domain::FanEventError::not_found("report", &report.id));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_open(
        &self,
        reporter_id: &str,
        target_kind: ReportTargetKind,
        target_id: &str,
    ) -> DomainResult<Option<Report>> {
        let db = Arc::clone(&self.db);
        let (reporter_id, target_id) = (reporter_id.to_string(), target_id.to_string());

        task::spawn_blocking(move || -> DomainResult<Option<Report>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!(
                    "SELECT {REPORT_COLUMNS} FROM reports
                     WHERE reporter_id = ?1 AND target_kind = ?2 AND target_id = ?3
                       AND status = ?4
                     LIMIT 1"
                ),
                params![
                    &reporter_id,
                    target_kind.as_str(),
                    &target_id,
                    ReportStatus::Open.as_str()
                ],
                map_report_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    /// Newest first, optionally filtered by status
    async fn list(&self, status: Option<ReportStatus>) -> DomainResult<Vec<Report>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Report>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {REPORT_COLUMNS} FROM reports
                     WHERE ?1 IS NULL OR status = ?1
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![status.map(|s| s.as_str())], map_report_row)
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_report_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    Ok(Report {
        id: row.get(0)?,
        reporter_id: row.get(1)?,
        target_kind: get_enum(row, 2)?,
        target_id: row.get(3)?,
        reason: row.get(4)?,
        status: get_enum(row, 5)?,
        resolver_id: row.get(6)?,
        resolution_note: row.get(7)?,
        created_at: get_ts(row, 8)?,
        resolved_at: get_opt_ts(row, 9)?,
    })
}

fn insert_report(conn: &SqliteConnection, report: &Report) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 10] = [
        &report.id,
        &report.reporter_id,
        &report.target_kind.as_str(),
        &report.target_id,
        &report.reason,
        &report.status.as_str(),
        &report.resolver_id,
        &report.resolution_note,
        &to_ts(report.created_at),
        &opt_ts(report.resolved_at),
    ];

    conn.execute(
        "INSERT INTO reports (
            id, reporter_id, target_kind, target_id, reason, status,
            resolver_id, resolution_note, created_at, resolved_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params.as_slice(),
    )?;

    Ok(())
}
