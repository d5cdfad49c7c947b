//! GroupChat entity - chat di gruppo con un solo admin

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupChat {
    pub id: String,
    pub name: String,
    pub admin_id: String, // creator, immutable
    pub created_at: DateTime<Utc>,
}

impl GroupChat {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_id == user_id
    }
}
