//! Message entity - entità messaggio (append-only)

use chrono::{DateTime, Utc};

/// Either `receiver_id` (direct message) or `group_chat_id` (group message) is set.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub sender_id: String,
    pub receiver_id: Option<String>,
    pub group_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
