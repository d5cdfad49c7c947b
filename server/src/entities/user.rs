//! User entity - entità utente con metodi per gestione password

use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Username of the shared guest account. Reserved: nobody can sign up with it.
pub const GUEST_USERNAME: &str = "guest-user";

/// Full user row. Never serialized: responses go through `UserDTO`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub image_url: Option<String>,
    pub is_guest: bool,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// MySQL compares usernames case-insensitively, so the reservation does too.
    pub fn is_reserved_username(username: &str) -> bool {
        username.eq_ignore_ascii_case(GUEST_USERNAME)
    }

    /// Verify if target_password matches the stored hashed password
    pub fn verify_password(&self, target_password: &str) -> bool {
        verify(target_password, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }
}

/// Public profile of a user, as shown to other users.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub image_url: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(value: &User) -> Self {
        Self {
            id: value.id.clone(),
            username: value.username.clone(),
            image_url: value.image_url.clone(),
        }
    }
}
