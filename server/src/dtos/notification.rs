//! Notification DTOs - proiezione dell'inbox

use crate::entities::{FriendshipStatus, NotificationType, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inbox entry. Exactly one of `friend_request` / `group_chat_invitation` is set,
/// the other serializes as `null`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub created_at: DateTime<Utc>,
    pub friend_request: Option<FriendRequestViewDTO>,
    pub group_chat_invitation: Option<GroupInvitationViewDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestViewDTO {
    pub id: String,
    pub status: FriendshipStatus,
    pub receiver_id: String,
    pub created_at: DateTime<Utc>,
    pub sender: UserProfile,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupInvitationViewDTO {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub admin: UserProfile,
}

impl NotificationDTO {
    pub fn friend_request(
        id: String,
        created_at: DateTime<Utc>,
        view: FriendRequestViewDTO,
    ) -> Self {
        Self {
            id,
            notification_type: NotificationType::FriendRequest,
            created_at,
            friend_request: Some(view),
            group_chat_invitation: None,
        }
    }

    pub fn group_invitation(
        id: String,
        created_at: DateTime<Utc>,
        view: GroupInvitationViewDTO,
    ) -> Self {
        Self {
            id,
            notification_type: NotificationType::GroupInvitation,
            created_at,
            friend_request: None,
            group_chat_invitation: Some(view),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NotificationsResponseDTO {
    pub notifications: Vec<NotificationDTO>,
}
