//! NotificationRepository - lettura dell'inbox con le join verso i target

use super::{NotificationStore, StoreError};
use crate::entities::NotificationRow;
use sqlx::MySqlPool;
use tracing::instrument;

// NOTIFICATION REPO
pub struct NotificationRepository {
    connection_pool: MySqlPool,
}

impl NotificationRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }
}

impl NotificationStore for NotificationRepository {
    #[instrument(skip(self))]
    async fn rows_for_user(&self, user_id: &str) -> Result<Vec<NotificationRow>, StoreError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT n.id, n.notification_type, n.created_at,
                   f.id AS friendship_id, f.status AS friendship_status,
                   f.receiver_id AS friendship_receiver_id, f.created_at AS friendship_created_at,
                   s.id AS sender_id, s.username AS sender_username, s.image_url AS sender_image_url,
                   g.id AS group_id, g.name AS group_name, g.created_at AS group_created_at,
                   a.id AS admin_id, a.username AS admin_username, a.image_url AS admin_image_url
            FROM notifications n
            LEFT JOIN friendships f ON f.id = n.friendship_id
            LEFT JOIN users s ON s.id = f.sender_id
            LEFT JOIN group_chats g ON g.id = n.group_chat_id
            LEFT JOIN users a ON a.id = g.admin_id
            WHERE n.user_id = ?
            ORDER BY n.created_at, n.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows)
    }
}
