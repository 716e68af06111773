//! Organizer application repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_common::storage::{SqliteConnection, StorageError};
use fanevent_core::applications::ports::ApplicationRepository as ApplicationRepositoryPort;
use fanevent_domain::{ModerationStatus, OrganizerApplication, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::rows::{
    get_enum, get_opt_ts, get_ts, map_join_error, map_storage_error, opt_ts, optional, to_ts,
};

const APPLICATION_COLUMNS: &str = "id, user_id, organization_name, motivation, experience, \
     status, reviewer_id, review_note, created_at, reviewed_at";

/// SQLite-backed implementation of `ApplicationRepository`
pub struct SqliteApplicationRepository {
    db: Arc<DbManager>,
}

impl SqliteApplicationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepositoryPort for SqliteApplicationRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<OrganizerApplication>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<OrganizerApplication>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {APPLICATION_COLUMNS} FROM organizer_applications WHERE id = ?1"),
                params![&id],
                map_application_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, application: OrganizerApplication) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_application(&conn, &application).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Persists the review outcome
    async fn update(&self, application: OrganizerApplication) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 5] = [
                &application.status.as_str(),
                &application.reviewer_id,
                &application.review_note,
                &opt_ts(application.reviewed_at),
                &application.id,
            ];
            let changed = conn
                .execute(
                    "UPDATE organizer_applications SET
                        status = ?1, reviewer_id = ?2, review_note = ?3, reviewed_at = ?4
                     WHERE id = ?5",
                    params.as_slice(),
                )
                .map_err(map_storage_error)?;
            if changed == 0 {
                return Err(fanevent_domain::FanEventError::not_found(
                    "application",
                    &application.id,
                ));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_pending_for_user(
        &self,
        user_id: &str,
    ) -> DomainResult<Option<OrganizerApplication>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<OrganizerApplication>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!(
                    "SELECT {APPLICATION_COLUMNS} FROM organizer_applications
                     WHERE user_id = ?1 AND status = ?2
                     ORDER BY created_at DESC LIMIT 1"
                ),
                params![&user_id, ModerationStatus::Pending.as_str()],
                map_application_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<OrganizerApplication>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<OrganizerApplication>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {APPLICATION_COLUMNS} FROM organizer_applications
                     WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&user_id], map_application_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> DomainResult<Vec<OrganizerApplication>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<OrganizerApplication>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {APPLICATION_COLUMNS} FROM organizer_applications
                     WHERE ?1 IS NULL OR status = ?1
                     ORDER BY created_at DESC, rowid DESC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![status.map(|s| s.as_str())], map_application_row)
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_application_row(row: &Row<'_>) -> rusqlite::Result<OrganizerApplication> {
    Ok(OrganizerApplication {
        id: row.get(0)?,
        user_id: row.get(1)?,
        organization_name: row.get(2)?,
        motivation: row.get(3)?,
        experience: row.get(4)?,
        status: get_enum(row, 5)?,
        reviewer_id: row.get(6)?,
        review_note: row.get(7)?,
        created_at: get_ts(row, 8)?,
        reviewed_at: get_opt_ts(row, 9)?,
    })
}

fn insert_application(
    conn: &SqliteConnection,
    application: &OrganizerApplication,
) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 10] = [
        &application.id,
        &application.user_id,
        &application.organization_name,
        &application.motivation,
        &application.experience,
        &application.status.as_str(),
        &application.reviewer_id,
        &application.review_note,
        &to_ts(application.created_at),
        &opt_ts(application.reviewed_at),
    ];

    conn.execute(
        "INSERT INTO organizer_applications (
            id, user_id, organization_name, motivation, experience, status,
            reviewer_id, review_note, created_at, reviewed_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params.as_slice(),
    )?;

    Ok(())
}
