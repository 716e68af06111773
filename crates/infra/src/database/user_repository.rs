//! User profile repository implementation using SQLite
//!
//! Profiles are created and refreshed from verified identity tokens.

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_common::storage::{SqliteConnection, StorageError};
use fanevent_core::users::ports::UserRepository as UserRepositoryPort;
use fanevent_domain::{Result as DomainResult, UserProfile};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::rows::{get_enum, get_ts, map_join_error, map_storage_error, optional, to_ts};

pub(crate) const USER_COLUMNS: &str = "u.id, u.auth_subject, u.email, u.display_name, \
     u.avatar_url, u.bio, u.role, u.created_at, u.updated_at";

/// SQLite-backed implementation of `UserRepository`
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserProfile>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?1"),
                params![&id],
                |row| map_user_row(row, 0),
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_by_subject(&self, subject: &str) -> DomainResult<Option<UserProfile>> {
        let db = Arc::clone(&self.db);
        let subject = subject.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserProfile>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users u WHERE u.auth_subject = ?1"),
                params![&subject],
                |row| map_user_row(row, 0),
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, profile: UserProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_user(&conn, &profile).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, profile: UserProfile) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_user(&conn, &profile).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, limit: u32, offset: u32) -> DomainResult<Vec<UserProfile>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<UserProfile>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users u
                     ORDER BY u.created_at ASC, u.id ASC LIMIT ?1 OFFSET ?2"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![limit, offset], |row| map_user_row(row, 0))
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_all(&self) -> DomainResult<Vec<UserProfile>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<UserProfile>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users u ORDER BY u.created_at ASC, u.id ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(&[], |row| map_user_row(row, 0)).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map the nine user columns starting at `offset`; joins reuse this with a
/// non-zero offset.
pub(crate) fn map_user_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(offset)?,
        auth_subject: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
        display_name: row.get(offset + 3)?,
        avatar_url: row.get(offset + 4)?,
        bio: row.get(offset + 5)?,
        role: get_enum(row, offset + 6)?,
        created_at: get_ts(row, offset + 7)?,
        updated_at: get_ts(row, offset + 8)?,
    })
}

fn insert_user(conn: &SqliteConnection, profile: &UserProfile) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 9] = [
        &profile.id,
        &profile.auth_subject,
        &profile.email,
        &profile.display_name,
        &profile.avatar_url,
        &profile.bio,
        &profile.role.as_str(),
        &to_ts(profile.created_at),
        &to_ts(profile.updated_at),
    ];

    conn.execute(
        "INSERT INTO users (
            id, auth_subject, email, display_name, avatar_url, bio, role, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params.as_slice(),
    )?;

    Ok(())
}

fn update_user(conn: &SqliteConnection, profile: &UserProfile) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 8] = [
        &profile.auth_subject,
        &profile.email,
        &profile.display_name,
        &profile.avatar_url,
        &profile.bio,
        &profile.role.as_str(),
        &to_ts(profile.updated_at),
        &profile.id, // WHERE clause
    ];

    let changed = conn.execute(
        "UPDATE users SET
            auth_subject = ?1, email = ?2, display_name = ?3, avatar_url = ?4,
            bio = ?5, role = ?6, updated_at = ?7
         WHERE id = ?8",
        params.as_slice(),
    )?;
    if changed == 0 {
        return Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use fanevent_domain::{FanEventError, Role};
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, SqliteUserRepository) {
        let dir = TempDir::new().unwrap();
        let db = DbManager::new(dir.path().join("users.db"), 2).unwrap();
        db.run_migrations().unwrap();
        (dir, SqliteUserRepository::new(Arc::new(db)))
    }

    fn profile(id: &str, subject: &str, created: i64) -> UserProfile {
        let at = DateTime::<Utc>::from_timestamp(created, 0).unwrap();
        UserProfile {
            id: id.into(),
            auth_subject: subject.into(),
            email: format!("{id}@example.com"),
            display_name: None,
            avatar_url: None,
            bio: None,
            role: Role::User,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn create_and_lookup_by_subject() {
        let (_dir, repo) = setup();
        repo.create(profile("u1", "auth|1", 1_000)).await.unwrap();

        let by_subject = repo.get_by_subject("auth|1").await.unwrap().unwrap();
        assert_eq!(by_subject.id, "u1");
        assert_eq!(repo.get_by_id("u1").await.unwrap(), Some(by_subject));
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_subject_is_a_conflict() {
        let (_dir, repo) = setup();
        repo.create(profile("u1", "auth|1", 1_000)).await.unwrap();

        let err = repo.create(profile("u2", "auth|1", 1_001)).await.unwrap_err();
        assert!(matches!(err, FanEventError::Conflict(_)), "unexpected: {err:?}");
    }

    #[tokio::test]
    async fn update_persists_role_and_fields() {
        let (_dir, repo) = setup();
        let mut user = profile("u1", "auth|1", 1_000);
        repo.create(user.clone()).await.unwrap();

        user.role = Role::Organizer;
        user.bio = Some("Ultras since 2009".into());
        repo.update(user.clone()).await.unwrap();

        let stored = repo.get_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Organizer);
        assert_eq!(stored.bio.as_deref(), Some("Ultras since 2009"));

        let err = repo.update(profile("ghost", "auth|x", 1)).await.unwrap_err();
        assert!(matches!(err, FanEventError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_pages_in_creation_order() {
        let (_dir, repo) = setup();
        for (i, id) in ["a", "b", "c"].iter().enumerate() {
            repo.create(profile(id, &format!("auth|{id}"), 1_000 + i as i64)).await.unwrap();
        }

        let page: Vec<String> =
            repo.list(2, 1).await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(page, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }
}
