//! Group DTOs - chat di gruppo, membri e inviti

use super::trimmed;
use crate::entities::{GroupChat, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of group creation and rename.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameDTO {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Group name must be between 1 and 100 characters."
    ))]
    pub group_name: String,
}

/// DTO per creare un nuovo gruppo (senza id)
#[derive(Debug, Clone)]
pub struct CreateGroupDTO {
    pub name: String,
    pub admin_id: String,
}

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InviteUsersDTO {
    #[validate(length(min = 1, message = "At least one user ID is required."))]
    pub user_ids: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupDTO {
    pub id: String,
    pub name: String,
    pub admin_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<GroupChat> for GroupDTO {
    fn from(value: GroupChat) -> Self {
        Self {
            id: value.id,
            name: value.name,
            admin_id: value.admin_id,
            created_at: value.created_at,
        }
    }
}

/// A group with its members (username ascending) and its admin.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupWithMembersDTO {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub users: Vec<UserProfile>,
    pub admin: UserProfile,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GroupResponseDTO<T> {
    pub group: T,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct GroupsResponseDTO {
    pub groups: Vec<GroupDTO>,
}
