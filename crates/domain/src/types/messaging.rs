//! Direct messaging types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation between two or more users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participant_ids: Vec<String>,
    pub last_message_preview: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|id| id == user_id)
    }

    /// Everyone except `user_id`.
    pub fn others<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a String> + 'a {
        self.participant_ids.iter().filter(move |id| id.as_str() != user_id)
    }
}

/// Conversation as seen by one participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread_count: u32,
}

/// Single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Truncate a message body for conversation previews.
pub fn message_preview(body: &str, max_chars: usize) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let mut preview: String = trimmed.chars().take(max_chars).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(message_preview("  hi  ", 10), "hi");
        assert_eq!(message_preview("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn others_excludes_caller() {
        let conversation = Conversation {
            id: "c".into(),
            participant_ids: vec!["a".into(), "b".into()],
            last_message_preview: None,
            last_message_at: None,
            created_at: Utc::now(),
        };
        assert_eq!(conversation.others("a").collect::<Vec<_>>(), vec!["b"]);
        assert!(conversation.has_participant("b"));
        assert!(!conversation.has_participant("z"));
    }
}
