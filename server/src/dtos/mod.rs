//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).
//! Sul filo tutti i campi sono in camelCase.

pub mod auth;
pub mod friendship;
pub mod group;
pub mod message;
pub mod notification;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use auth::{AuthResponseDTO, LogInDTO, SignUpDTO};
pub use friendship::{
    CreateFriendRequestDTO, CreateFriendshipDTO, FriendRequestSentDTO, FriendshipDTO,
    FriendshipResponseDTO,
};
pub use group::{
    CreateGroupDTO, GroupDTO, GroupNameDTO, GroupResponseDTO, GroupWithMembersDTO,
    GroupsResponseDTO, InviteUsersDTO,
};
pub use message::{CreateMessageDTO, MessageDTO, MessageResponseDTO, MessageTarget, MessagesResponseDTO};
pub use notification::{
    FriendRequestViewDTO, GroupInvitationViewDTO, NotificationDTO, NotificationsResponseDTO,
};
pub use user::{CreateUserDTO, FriendsResponseDTO, NonFriendsResponseDTO, UserDTO};

/// serde helper: trims surrounding whitespace before validation runs.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}
