//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod auth;
pub mod friendship;
pub mod group;
pub mod message;
pub mod notification;
pub mod user;

// Re-exports per facilitare l'import
pub use auth::{guest, log_in, sign_up};
pub use friendship::{
    accept_friendship, create_friend_request, delete_friendship, get_friendship_with,
};
pub use group::{
    accept_invite, create_group, delete_group, get_group, invite_users, list_groups,
    reject_invite, remove_member, rename_group,
};
pub use message::{get_direct_messages, get_group_messages, send_direct_message, send_group_message};
pub use notification::get_my_notifications;
pub use user::{get_anonymous, get_friends, get_me};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
