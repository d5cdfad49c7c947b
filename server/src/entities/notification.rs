//! Notification entity - voce dell'inbox di un utente

use super::enums::{FriendshipStatus, NotificationType};
use chrono::{DateTime, Utc};

/// Exactly one of `friendship_id` / `group_chat_id` is set, matching `notification_type`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub friendship_id: Option<String>,
    pub group_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A notification joined with whatever it points at.
/// Friend request columns are null for group invitations and vice versa.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: String,
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,

    pub friendship_id: Option<String>,
    pub friendship_status: Option<FriendshipStatus>,
    pub friendship_receiver_id: Option<String>,
    pub friendship_created_at: Option<DateTime<Utc>>,
    pub sender_id: Option<String>,
    pub sender_username: Option<String>,
    pub sender_image_url: Option<String>,

    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub group_created_at: Option<DateTime<Utc>>,
    pub admin_id: Option<String>,
    pub admin_username: Option<String>,
    pub admin_image_url: Option<String>,
}
