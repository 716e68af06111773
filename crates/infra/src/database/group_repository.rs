//! Group and membership repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_common::storage::{SqliteConnection, StorageError};
use fanevent_core::groups::ports::GroupRepository as GroupRepositoryPort;
use fanevent_domain::{Group, GroupMember, ModerationStatus, Result as DomainResult};
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::rows::{get_enum, get_ts, map_join_error, map_storage_error, optional, to_ts};
use super::user_repository::{map_user_row, USER_COLUMNS};

const GROUP_COLUMNS: &str = "g.id, g.name, g.description, g.category, g.image_url, g.owner_id, \
     g.status, g.moderation_note, g.created_at, g.updated_at";

/// SQLite-backed implementation of `GroupRepository`
pub struct SqliteGroupRepository {
    db: Arc<DbManager>,
}

impl SqliteGroupRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GroupRepositoryPort for SqliteGroupRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Group>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Group>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {GROUP_COLUMNS} FROM fan_groups g WHERE g.id = ?1"),
                params![&id],
                map_group_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, group: Group) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            insert_group(&conn, &group).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, group: Group) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            update_group(&conn, &group).map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Memberships cascade; events of the group keep existing without it.
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("DELETE FROM fan_groups WHERE id = ?1", params![&id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_status(&self, status: ModerationStatus) -> DomainResult<Vec<Group>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Group>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {GROUP_COLUMNS} FROM fan_groups g
                     WHERE g.status = ?1 ORDER BY g.created_at ASC, g.id ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![status.as_str()], map_group_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Groups the user owns or belongs to, by name
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Group>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<Group>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {GROUP_COLUMNS} FROM fan_groups g
                     WHERE g.owner_id = ?1
                        OR EXISTS (SELECT 1 FROM group_members m
                                   WHERE m.group_id = g.id AND m.user_id = ?1)
                     ORDER BY g.name ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&user_id], map_group_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        joined_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (group_id, user_id) = (group_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(group_id, user_id) DO NOTHING",
                    params![&group_id, &user_id, to_ts(joined_at)],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (group_id, user_id) = (group_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "DELETE FROM group_members WHERE group_id = ?1 AND user_id = ?2",
                    params![&group_id, &user_id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn is_member(&self, group_id: &str, user_id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let (group_id, user_id) = (group_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM group_members WHERE group_id = ?1 AND user_id = ?2)",
                params![&group_id, &user_id],
                |row| row.get::<_, bool>(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn member_count(&self, group_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let group_id = group_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM group_members WHERE group_id = ?1",
                params![&group_id],
                |row| row.get::<_, u32>(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn members(&self, group_id: &str) -> DomainResult<Vec<GroupMember>> {
        let db = Arc::clone(&self.db);
        let group_id = group_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<GroupMember>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT m.group_id, m.joined_at, {USER_COLUMNS}
                     FROM group_members m JOIN users u ON u.id = m.user_id
                     WHERE m.group_id = ?1
                     ORDER BY m.joined_at ASC, m.rowid ASC"
                ))
                .map_err(map_storage_error)?;
            stmt.query_map(params![&group_id], |row| {
                let user = map_user_row(row, 2)?;
                Ok(GroupMember {
                    group_id: row.get(0)?,
                    user_id: user.id.clone(),
                    display_name: user.public_name().to_string(),
                    joined_at: get_ts(row, 1)?,
                })
            })
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn map_group_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        image_url: row.get(4)?,
        owner_id: row.get(5)?,
        status: get_enum(row, 6)?,
        moderation_note: row.get(7)?,
        created_at: get_ts(row, 8)?,
        updated_at: get_ts(row, 9)?,
    })
}

fn insert_group(conn: &SqliteConnection, group: &Group) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 10] = [
        &group.id,
        &group.name,
        &group.description,
        &group.category,
        &group.image_url,
        &group.owner_id,
        &group.status.as_str(),
        &group.moderation_note,
        &to_ts(group.created_at),
        &to_ts(group.updated_at),
    ];

    conn.execute(
        "INSERT INTO fan_groups (
            id, name, description, category, image_url, owner_id, status,
            moderation_note, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params.as_slice(),
    )?;

    Ok(())
}

fn update_group(conn: &SqliteConnection, group: &Group) -> Result<(), StorageError> {
    let params: [&dyn ToSql; 9] = [
        &group.name,
        &group.description,
        &group.category,
        &group.image_url,
        &group.owner_id,
        &group.status.as_str(),
        &group.moderation_note,
        &to_ts(group.updated_at),
        &group.id, // WHERE clause
    ];

    let changed = conn.execute(
        "UPDATE fan_groups SET
            name = ?1, description = ?2, category = ?3, image_url = ?4, owner_id = ?5,
            status = ?6, moderation_note = ?7, updated_at = ?8
         WHERE id = ?9",
        params.as_slice(),
    )?;
    if changed == 0 {
        return Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows));
    }

    Ok(())
}
