//! Message DTOs - messaggi diretti e di gruppo

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where a message goes: another user or a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    User(String),
    Group(String),
}

/// DTO per creare un nuovo messaggio (senza id).
/// Built from the multipart form, so content is trimmed by hand before validation.
#[derive(Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message must be between 1 and 5000 characters."
    ))]
    pub content: String,
    pub image_url: Option<String>,
    pub sender_id: String,
    pub target: MessageTarget,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MessageDTO {
    pub id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub sender_id: String,
    pub receiver_id: Option<String>,
    pub group_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            content: value.content,
            image_url: value.image_url,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            group_chat_id: value.group_chat_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponseDTO {
    pub message: MessageDTO,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MessagesResponseDTO {
    pub messages: Vec<MessageDTO>,
}
