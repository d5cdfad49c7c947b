//! FriendshipRepository - Repository per richieste di amicizia e amicizie

use super::{RelationshipStore, StoreError};
use crate::dtos::CreateFriendshipDTO;
use crate::entities::{
    FriendRequestRecord, Friendship, FriendshipStatus, NotificationType, User, UserProfile,
};
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// FRIENDSHIP REPO
pub struct FriendshipRepository {
    connection_pool: MySqlPool,
}

impl FriendshipRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

impl RelationshipStore for FriendshipRepository {
    #[instrument(skip(self))]
    async fn find_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRecord>, StoreError> {
        let record = sqlx::query_as::<_, FriendRequestRecord>(
            r#"
            SELECT f.id, f.sender_id, f.receiver_id, f.status, f.created_at,
                   u.username AS sender_username
            FROM friendships f
            JOIN users u ON u.id = f.sender_id
            WHERE f.pair_key = ?
            "#,
        )
        .bind(Friendship::pair_key(user_a, user_b))
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_friendship(&self, id: &str) -> Result<Option<Friendship>, StoreError> {
        let friendship = sqlx::query_as::<_, Friendship>(
            "SELECT id, sender_id, receiver_id, status, created_at FROM friendships WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(friendship)
    }

    #[instrument(skip(self, data), fields(sender = %data.sender_id, receiver = %data.receiver_id))]
    async fn create_pending(&self, data: &CreateFriendshipDTO) -> Result<Friendship, StoreError> {
        let friendship = Friendship {
            id: Uuid::new_v4().to_string(),
            sender_id: data.sender_id.clone(),
            receiver_id: data.receiver_id.clone(),
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        };

        let mut tx = self.connection_pool.begin().await?;

        sqlx::query(
            "INSERT INTO friendships (id, sender_id, receiver_id, pair_key, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&friendship.id)
        .bind(&friendship.sender_id)
        .bind(&friendship.receiver_id)
        .bind(Friendship::pair_key(&friendship.sender_id, &friendship.receiver_id))
        .bind(friendship.status)
        .bind(friendship.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO notifications (id, user_id, notification_type, friendship_id, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&friendship.receiver_id)
        .bind(NotificationType::FriendRequest)
        .bind(&friendship.id)
        .bind(friendship.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(friendship_id = %friendship.id, "Friend request created");
        Ok(friendship)
    }

    #[instrument(skip(self))]
    async fn set_status(
        &self,
        id: &str,
        status: FriendshipStatus,
    ) -> Result<Friendship, StoreError> {
        // rows_affected non è affidabile se lo stato non cambia: rileggo
        sqlx::query("UPDATE friendships SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        self.find_friendship(id).await?.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn delete_friendship(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!("Friendship deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn accepted_senders_to(&self, user_id: &str) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.password, u.image_url, u.is_guest, u.last_seen, u.created_at
            FROM friendships f
            JOIN users u ON u.id = f.sender_id
            WHERE f.receiver_id = ? AND f.status = ?
            ORDER BY f.created_at, f.id
            "#,
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn accepted_receivers_from(&self, user_id: &str) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.password, u.image_url, u.is_guest, u.last_seen, u.created_at
            FROM friendships f
            JOIN users u ON u.id = f.receiver_id
            WHERE f.sender_id = ? AND f.status = ?
            ORDER BY f.created_at, f.id
            "#,
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }

    #[instrument(skip(self))]
    async fn non_friends_of(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let users = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT u.id, u.username, u.image_url
            FROM users u
            WHERE u.id <> ?
              AND NOT EXISTS (
                SELECT 1 FROM friendships f
                WHERE f.status = ?
                  AND ((f.sender_id = u.id AND f.receiver_id = ?)
                    OR (f.receiver_id = u.id AND f.sender_id = ?))
              )
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(users)
    }
}
