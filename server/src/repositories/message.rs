//! MessageRepository - Repository per i messaggi (solo inserimento e lettura)

use super::StoreError;
use crate::dtos::{CreateMessageDTO, MessageTarget};
use crate::entities::Message;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, instrument};
use uuid::Uuid;

// MESSAGE REPO
pub struct MessageRepository {
    connection_pool: MySqlPool,
}

impl MessageRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self, data), fields(sender = %data.sender_id))]
    pub async fn create(&self, data: &CreateMessageDTO) -> Result<Message, StoreError> {
        let (receiver_id, group_chat_id) = match &data.target {
            MessageTarget::User(id) => (Some(id.clone()), None),
            MessageTarget::Group(id) => (None, Some(id.clone())),
        };

        let message = Message {
            id: Uuid::new_v4().to_string(),
            content: data.content.clone(),
            image_url: data.image_url.clone(),
            sender_id: data.sender_id.clone(),
            receiver_id,
            group_chat_id,
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO messages (id, content, image_url, sender_id, receiver_id, group_chat_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.content)
        .bind(&message.image_url)
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.group_chat_id)
        .bind(message.created_at)
        .execute(&self.connection_pool)
        .await?;

        debug!(message_id = %message.id, "Message stored");
        Ok(message)
    }

    /// Direct messages between two users in both directions, oldest first.
    #[instrument(skip(self))]
    pub async fn between_users(&self, user_a: &str, user_b: &str) -> Result<Vec<Message>, StoreError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, content, image_url, sender_id, receiver_id, group_chat_id, created_at
            FROM messages
            WHERE (sender_id = ? AND receiver_id = ?)
               OR (sender_id = ? AND receiver_id = ?)
            ORDER BY created_at, id
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }

    #[instrument(skip(self))]
    pub async fn in_group(&self, group_id: &str) -> Result<Vec<Message>, StoreError> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, content, image_url, sender_id, receiver_id, group_chat_id, created_at
            FROM messages
            WHERE group_chat_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(messages)
    }
}
