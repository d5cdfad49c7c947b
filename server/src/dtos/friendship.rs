//! Friendship DTOs - richieste di amicizia

use crate::entities::{Friendship, FriendshipStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /friendships`. `senderId` is optional and, if present, must be the caller.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFriendRequestDTO {
    #[validate(length(min = 1, message = "Receiver ID is required."))]
    pub receiver_id: String,
    pub sender_id: Option<String>,
}

/// DTO per creare una friendship PENDING (senza id)
#[derive(Debug, Clone)]
pub struct CreateFriendshipDTO {
    pub sender_id: String,
    pub receiver_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipDTO {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Friendship> for FriendshipDTO {
    fn from(value: Friendship) -> Self {
        Self {
            id: value.id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestSentDTO {
    pub message: String,
    pub friend_request: FriendshipDTO,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendshipResponseDTO {
    pub friendship: FriendshipDTO,
}
