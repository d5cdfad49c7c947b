//! UserRepository - Repository per la gestione degli utenti

use super::StoreError;
use crate::dtos::CreateUserDTO;
use crate::entities::User;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, password, image_url, is_guest, last_seen, created_at";

// USER REPO
pub struct UserRepository {
    connection_pool: MySqlPool,
}

impl UserRepository {
    pub fn new(connection_pool: MySqlPool) -> UserRepository {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// considero l'username univoco
    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// Inserts a user. `UniqueViolation` if the username is taken.
    #[instrument(skip(self, data), fields(username = %data.username))]
    pub async fn create(&self, data: &CreateUserDTO) -> Result<User, StoreError> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: data.username.clone(),
            password: data.password.clone(),
            image_url: None,
            is_guest: data.is_guest,
            last_seen: now,
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO users (id, username, password, image_url, is_guest, last_seen, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.image_url)
        .bind(user.is_guest)
        .bind(user.last_seen)
        .bind(user.created_at)
        .execute(&self.connection_pool)
        .await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Returns the guest account, creating it on first use.
    /// A concurrent creation is absorbed by reading the winner back.
    #[instrument(skip(self, data), fields(username = %data.username))]
    pub async fn get_or_create_guest(&self, data: &CreateUserDTO) -> Result<User, StoreError> {
        if let Some(user) = self.find_by_username(&data.username).await? {
            return Ok(user);
        }

        match self.create(data).await {
            Ok(user) => Ok(user),
            Err(StoreError::UniqueViolation(_)) => {
                debug!("Guest account created concurrently, reading it back");
                self.find_by_username(&data.username)
                    .await?
                    .ok_or(StoreError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Sets last_seen to now and returns the refreshed user.
    #[instrument(skip(self))]
    pub async fn touch_last_seen(&self, id: &str) -> Result<User, StoreError> {
        sqlx::query("UPDATE users SET last_seen = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.find_by_id(id).await?.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, id: &str) -> Result<bool, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.connection_pool)
            .await?;

        Ok(count > 0)
    }
}
