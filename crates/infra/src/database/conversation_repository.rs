//! Direct-message repository implementation using SQLite
//!
//! Unread counters live on the participant rows and are bumped in the same
//! transaction that appends a message.

use std::sync::Arc;

use async_trait::async_trait;
use fanevent_core::messaging::ports::ConversationRepository as ConversationRepositoryPort;
use fanevent_domain::{
    Conversation, ConversationView, FanEventError, Message, Result as DomainResult,
};
use rusqlite::{params, Connection, Row};
use tokio::task;

use super::manager::DbManager;
use super::rows::{
    get_opt_ts, get_ts, map_join_error, map_sql_error, map_storage_error, opt_ts, optional, to_ts,
};

const CONVERSATION_COLUMNS: &str = "c.id, c.last_message_preview, c.last_message_at, c.created_at";
const MESSAGE_COLUMNS: &str = "m.id, m.conversation_id, m.sender_id, m.body, m.created_at";

/// SQLite-backed implementation of `ConversationRepository`
pub struct SqliteConversationRepository {
    db: Arc<DbManager>,
}

impl SqliteConversationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationRepositoryPort for SqliteConversationRepository {
    async fn get(&self, id: &str) -> DomainResult<Option<Conversation>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Conversation>> {
            let conn = db.get_connection()?;
            let found = optional(conn.query_row(
                &format!("SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE c.id = ?1"),
                params![&id],
                map_conversation_row,
            ))?;
            match found {
                Some(conversation) => Ok(Some(with_participants(&conn, conversation)?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    /// The two-person conversation between `a` and `b`, if one exists
    async fn find_direct(&self, a: &str, b: &str) -> DomainResult<Option<Conversation>> {
        let db = Arc::clone(&self.db);
        let (a, b) = (a.to_string(), b.to_string());

        task::spawn_blocking(move || -> DomainResult<Option<Conversation>> {
            let conn = db.get_connection()?;
            let found = optional(conn.query_row(
                &format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations c
                     WHERE (SELECT COUNT(*) FROM conversation_participants p
                            WHERE p.conversation_id = c.id) = 2
                       AND EXISTS (SELECT 1 FROM conversation_participants p
                                   WHERE p.conversation_id = c.id AND p.user_id = ?1)
                       AND EXISTS (SELECT 1 FROM conversation_participants p
                                   WHERE p.conversation_id = c.id AND p.user_id = ?2)
                     ORDER BY c.created_at ASC
                     LIMIT 1"
                ),
                params![&a, &b],
                map_conversation_row,
            ))?;
            match found {
                Some(conversation) => Ok(Some(with_participants(&conn, conversation)?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, conversation: Conversation) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;

            tx.execute(
                "INSERT INTO conversations (id, last_message_preview, last_message_at, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &conversation.id,
                    &conversation.last_message_preview,
                    opt_ts(conversation.last_message_at),
                    to_ts(conversation.created_at),
                ],
            )
            .map_err(map_sql_error)?;
            for participant in &conversation.participant_ids {
                tx.execute(
                    "INSERT INTO conversation_participants (conversation_id, user_id, unread_count)
                     VALUES (?1, ?2, 0)",
                    params![&conversation.id, participant],
                )
                .map_err(map_sql_error)?;
            }
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// The user's conversations, most recently active first
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ConversationView>> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Vec<ConversationView>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {CONVERSATION_COLUMNS}, p.unread_count
                     FROM conversations c
                     JOIN conversation_participants p ON p.conversation_id = c.id
                     WHERE p.user_id = ?1
                     ORDER BY COALESCE(c.last_message_at, c.created_at) DESC, c.rowid DESC"
                ))
                .map_err(map_storage_error)?;
            let rows: Vec<(Conversation, u32)> = stmt
                .query_map(params![&user_id], |row| Ok((map_conversation_row(row)?, row.get(4)?)))
                .map_err(map_storage_error)?;
            drop(stmt);

            rows.into_iter()
                .map(|(conversation, unread_count)| -> DomainResult<ConversationView> {
                    Ok(ConversationView {
                        conversation: with_participants(&conn, conversation)?,
                        unread_count,
                    })
                })
                .collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn unread_count(&self, conversation_id: &str, user_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let (conversation_id, user_id) = (conversation_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            let count = optional(conn.query_row(
                "SELECT unread_count FROM conversation_participants
                 WHERE conversation_id = ?1 AND user_id = ?2",
                params![&conversation_id, &user_id],
                |row| row.get::<_, u32>(0),
            ))?;
            Ok(count.unwrap_or(0))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn append_message(&self, message: Message, preview: String) -> DomainResult<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;

            tx.execute(
                "INSERT INTO messages (id, conversation_id, sender_id, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    &message.id,
                    &message.conversation_id,
                    &message.sender_id,
                    &message.body,
                    to_ts(message.created_at),
                ],
            )
            .map_err(map_sql_error)?;
            tx.execute(
                "UPDATE conversations SET last_message_preview = ?1, last_message_at = ?2
                 WHERE id = ?3",
                params![&preview, to_ts(message.created_at), &message.conversation_id],
            )
            .map_err(map_sql_error)?;
            tx.execute(
                "UPDATE conversation_participants SET unread_count = unread_count + 1
                 WHERE conversation_id = ?1 AND user_id != ?2",
                params![&message.conversation_id, &message.sender_id],
            )
            .map_err(map_sql_error)?;
            tx.commit().map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Up to `limit` messages older than `before`, returned oldest first.
    /// A `before` id that is not a message of this conversation is NotFound.
    async fn messages(
        &self,
        conversation_id: &str,
        limit: u32,
        before: Option<&str>,
    ) -> DomainResult<Vec<Message>> {
        let db = Arc::clone(&self.db);
        let conversation_id = conversation_id.to_string();
        let before = before.map(str::to_string);

        task::spawn_blocking(move || -> DomainResult<Vec<Message>> {
            let conn = db.get_connection()?;
            let mut messages = match before {
                Some(before) => {
                    let cursor: i64 = optional(conn.query_row(
                        "SELECT rowid FROM messages WHERE id = ?1 AND conversation_id = ?2",
                        params![&before, &conversation_id],
                        |row| row.get(0),
                    ))?
                    .ok_or_else(|| FanEventError::not_found("message", &before))?;

                    let mut stmt = conn
                        .prepare(&format!(
                            "SELECT {MESSAGE_COLUMNS} FROM messages m
                             WHERE m.conversation_id = ?1 AND m.rowid < ?2
                             ORDER BY m.rowid DESC LIMIT ?3"
                        ))
                        .map_err(map_storage_error)?;
                    stmt.query_map(params![&conversation_id, cursor, limit], map_message_row)
                        .map_err(map_storage_error)?
                }
                None => {
                    let mut stmt = conn
                        .prepare(&format!(
                            "SELECT {MESSAGE_COLUMNS} FROM messages m
                             WHERE m.conversation_id = ?1
                             ORDER BY m.rowid DESC LIMIT ?2"
                        ))
                        .map_err(map_storage_error)?;
                    stmt.query_map(params![&conversation_id, limit], map_message_row)
                        .map_err(map_storage_error)?
                }
            };
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_message(&self, id: &str) -> DomainResult<Option<Message>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Message>> {
            let conn = db.get_connection()?;
            optional(conn.query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1"),
                params![&id],
                map_message_row,
            ))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_read(&self, conversation_id: &str, user_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let (conversation_id, user_id) = (conversation_id.to_string(), user_id.to_string());

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE conversation_participants SET unread_count = 0
                 WHERE conversation_id = ?1 AND user_id = ?2",
                params![&conversation_id, &user_id],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn unread_total(&self, user_id: &str) -> DomainResult<u32> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();

        task::spawn_blocking(move || -> DomainResult<u32> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COALESCE(SUM(unread_count), 0) FROM conversation_participants
                 WHERE user_id = ?1",
                params![&user_id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Conversation row without participants; see [`with_participants`].
fn map_conversation_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        participant_ids: Vec::new(),
        last_message_preview: row.get(1)?,
        last_message_at: get_opt_ts(row, 2)?,
        created_at: get_ts(row, 3)?,
    })
}

fn with_participants(
    conn: &Connection,
    mut conversation: Conversation,
) -> DomainResult<Conversation> {
    let mut stmt = conn
        .prepare(
            "SELECT user_id FROM conversation_participants
             WHERE conversation_id = ?1 ORDER BY rowid ASC",
        )
        .map_err(map_sql_error)?;
    conversation.participant_ids = stmt
        .query_map(params![&conversation.id], |row| row.get(0))
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<String>>>()
        .map_err(map_sql_error)?;
    Ok(conversation)
}

fn map_message_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        sender_id: row.get(2)?,
        body: row.get(3)?,
        created_at: get_ts(row, 4)?,
    })
}
