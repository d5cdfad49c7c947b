//! User DTOs - Data Transfer Objects per utenti

use crate::entities::{User, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as returned to its owner and to friends. The password hash never leaves the server.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: String,
    pub username: String,
    pub image_url: Option<String>,
    pub is_guest: bool,
    pub last_seen: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            username: value.username,
            image_url: value.image_url,
            is_guest: value.is_guest,
            last_seen: value.last_seen,
        }
    }
}

/// DTO per creare un nuovo utente (password già hashata)
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
    pub is_guest: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendsResponseDTO {
    pub friends: Vec<UserDTO>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NonFriendsResponseDTO {
    pub non_friends: Vec<UserProfile>,
}
