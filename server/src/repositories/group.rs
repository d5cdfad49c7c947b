//! GroupRepository - Repository per chat di gruppo, membri e inviti

use super::{GroupStore, StoreError};
use crate::dtos::CreateGroupDTO;
use crate::entities::{GroupChat, Notification, NotificationType, UserProfile};
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// GROUP REPO
pub struct GroupRepository {
    connection_pool: MySqlPool,
}

impl GroupRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

impl GroupStore for GroupRepository {
    #[instrument(skip(self, data), fields(admin = %data.admin_id))]
    async fn create_group(&self, data: &CreateGroupDTO) -> Result<GroupChat, StoreError> {
        let group = GroupChat {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            admin_id: data.admin_id.clone(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO group_chats (id, name, admin_id, created_at) VALUES (?, ?, ?, ?)")
            .bind(&group.id)
            .bind(&group.name)
            .bind(&group.admin_id)
            .bind(group.created_at)
            .execute(&self.connection_pool)
            .await?;

        info!(group_id = %group.id, "Group created");
        Ok(group)
    }

    #[instrument(skip(self))]
    async fn find_group(&self, group_id: &str) -> Result<Option<GroupChat>, StoreError> {
        let group = sqlx::query_as::<_, GroupChat>(
            "SELECT id, name, admin_id, created_at FROM group_chats WHERE id = ?",
        )
        .bind(group_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(group)
    }

    #[instrument(skip(self))]
    async fn members_of(&self, group_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let members = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT u.id, u.username, u.image_url
            FROM group_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = ?
            ORDER BY u.username
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(members)
    }

    #[instrument(skip(self))]
    async fn admin_of(&self, group_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let admin = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT u.id, u.username, u.image_url
            FROM group_chats g
            JOIN users u ON u.id = g.admin_id
            WHERE g.id = ?
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = ? AND user_id = ?")
                .bind(group_id)
                .bind(user_id)
                .fetch_one(&self.connection_pool)
                .await?;

        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn groups_for(&self, user_id: &str) -> Result<Vec<GroupChat>, StoreError> {
        let groups = sqlx::query_as::<_, GroupChat>(
            r#"
            SELECT g.id, g.name, g.admin_id, g.created_at
            FROM group_chats g
            WHERE g.admin_id = ?
               OR EXISTS (
                 SELECT 1 FROM group_members m WHERE m.group_id = g.id AND m.user_id = ?
               )
            ORDER BY g.created_at, g.id
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(groups)
    }

    #[instrument(skip(self, user_ids), fields(count = user_ids.len()))]
    async fn create_invitations(
        &self,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<Notification>, StoreError> {
        let now = Utc::now();
        let mut created = Vec::with_capacity(user_ids.len());

        // tutto o niente: un id sbagliato annulla l'intero batch
        let mut tx = self.connection_pool.begin().await?;

        for user_id in user_ids {
            let notification = Notification {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                notification_type: NotificationType::GroupInvitation,
                friendship_id: None,
                group_chat_id: Some(group_id.to_string()),
                created_at: now,
            };

            sqlx::query(
                "INSERT INTO notifications (id, user_id, notification_type, group_chat_id, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&notification.id)
            .bind(&notification.user_id)
            .bind(notification.notification_type)
            .bind(&notification.group_chat_id)
            .bind(notification.created_at)
            .execute(&mut *tx)
            .await?;

            created.push(notification);
        }

        tx.commit().await?;

        info!(group_id, "Group invitations created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn has_invitation(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications \
             WHERE group_chat_id = ? AND user_id = ? AND notification_type = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(NotificationType::GroupInvitation)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn accept_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        let mut tx = self.connection_pool.begin().await?;

        let consumed = sqlx::query(
            "DELETE FROM notifications \
             WHERE group_chat_id = ? AND user_id = ? AND notification_type = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(NotificationType::GroupInvitation)
        .execute(&mut *tx)
        .await?;

        // nessun invito: il drop della transazione fa rollback
        if consumed.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        sqlx::query(
            "INSERT INTO group_members (group_id, user_id, joined_at) VALUES (?, ?, ?) \
             ON DUPLICATE KEY UPDATE joined_at = joined_at",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Group invitation accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            "DELETE FROM notifications \
             WHERE group_chat_id = ? AND user_id = ? AND notification_type = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .bind(NotificationType::GroupInvitation)
        .execute(&self.connection_pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        debug!("Group invitation deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupChat, StoreError> {
        sqlx::query("UPDATE group_chats SET name = ? WHERE id = ?")
            .bind(name)
            .bind(group_id)
            .execute(&self.connection_pool)
            .await?;

        self.find_group(group_id).await?.ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self))]
    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        debug!(removed = result.rows_affected(), "Group member removal");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError> {
        // membri, inviti e messaggi vanno via con ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM group_chats WHERE id = ?")
            .bind(group_id)
            .execute(&self.connection_pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        info!("Group deleted");
        Ok(())
    }
}
