//! Friendship entity - richiesta di amicizia direzionale

use super::enums::FriendshipStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Friendship {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// Key shared by both directions of a pair: "<smaller id>:<larger id>".
    /// The store keeps it unique, so a pair has at most one record.
    pub fn pair_key(user_a: &str, user_b: &str) -> String {
        if user_a <= user_b {
            format!("{}:{}", user_a, user_b)
        } else {
            format!("{}:{}", user_b, user_a)
        }
    }

    pub fn involves(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }
}

/// A friendship looked up by pair, with the username of whoever sent it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendRequestRecord {
    #[sqlx(flatten)]
    pub friendship: Friendship,
    pub sender_username: String,
}
