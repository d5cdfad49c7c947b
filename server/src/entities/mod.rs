//! Entities module - entità del dominio applicativo
//!
//! Ogni entity corrisponde a una tabella (o a una join) nel database.

pub mod enums;
pub mod friendship;
pub mod group_chat;
pub mod message;
pub mod notification;
pub mod user;

// Re-exports per facilitare l'import
pub use enums::{FriendshipStatus, NotificationType};
pub use friendship::{FriendRequestRecord, Friendship};
pub use group_chat::GroupChat;
pub use message::Message;
pub use notification::{Notification, NotificationRow};
pub use user::{GUEST_USERNAME, User, UserProfile};
