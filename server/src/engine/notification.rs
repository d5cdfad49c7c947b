//! Notification projector - inbox derivata dallo stato persistito
//!
//! Una FRIEND_REQUEST resta visibile finché la sua friendship è PENDING: accettare la
//! richiesta non cancella la notifica, la nasconde. Un GROUP_INVITATION vive finché
//! esiste (accept e reject lo cancellano).

use super::EngineError;
use crate::dtos::{FriendRequestViewDTO, GroupInvitationViewDTO, NotificationDTO};
use crate::entities::{FriendshipStatus, NotificationRow, NotificationType, UserProfile};
use crate::repositories::NotificationStore;
use tracing::{instrument, warn};

/// Live notifications of a user, in storage order.
#[instrument(skip(store))]
pub async fn get_user_notifications<S: NotificationStore>(
    store: &S,
    user_id: &str,
) -> Result<Vec<NotificationDTO>, EngineError> {
    let rows = store.rows_for_user(user_id).await?;
    Ok(project(rows))
}

/// Filters the joined rows down to live entries and shapes them.
pub fn project(rows: Vec<NotificationRow>) -> Vec<NotificationDTO> {
    rows.into_iter().filter_map(project_row).collect()
}

fn project_row(row: NotificationRow) -> Option<NotificationDTO> {
    match row.notification_type {
        NotificationType::FriendRequest => {
            if row.friendship_status != Some(FriendshipStatus::Pending) {
                return None;
            }
            let view = friend_request_view(&row);
            if view.is_none() {
                warn!(notification_id = %row.id, "Friend request notification without its friendship");
            }
            view.map(|view| NotificationDTO::friend_request(row.id, row.created_at, view))
        }
        NotificationType::GroupInvitation => {
            let view = group_invitation_view(&row);
            if view.is_none() {
                warn!(notification_id = %row.id, "Group invitation without its group");
            }
            view.map(|view| NotificationDTO::group_invitation(row.id, row.created_at, view))
        }
    }
}

fn friend_request_view(row: &NotificationRow) -> Option<FriendRequestViewDTO> {
    Some(FriendRequestViewDTO {
        id: row.friendship_id.clone()?,
        status: row.friendship_status?,
        receiver_id: row.friendship_receiver_id.clone()?,
        created_at: row.friendship_created_at?,
        sender: UserProfile {
            id: row.sender_id.clone()?,
            username: row.sender_username.clone()?,
            image_url: row.sender_image_url.clone(),
        },
    })
}

fn group_invitation_view(row: &NotificationRow) -> Option<GroupInvitationViewDTO> {
    Some(GroupInvitationViewDTO {
        id: row.group_id.clone()?,
        name: row.group_name.clone()?,
        created_at: row.group_created_at?,
        admin: UserProfile {
            id: row.admin_id.clone()?,
            username: row.admin_username.clone()?,
            image_url: row.admin_image_url.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::group::{
        accept_group_invite, create_group, delete_group, reject_group_invite,
        send_group_invite_to_users,
    };
    use crate::engine::memory::MemoryStore;
    use crate::engine::relationship::{
        accept_friend_request, delete_friend_request, send_friend_request,
    };

    #[tokio::test]
    async fn pending_friend_request_is_listed_with_sender() {
        let store = MemoryStore::with_users(&["john", "bodi"]);
        let (john, bodi) = (store.id("john"), store.id("bodi"));
        let sent = send_friend_request(&store, &john, &bodi).await.unwrap();

        let inbox = get_user_notifications(&store, &bodi).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::FriendRequest);
        assert!(inbox[0].group_chat_invitation.is_none());
        let request = inbox[0].friend_request.as_ref().unwrap();
        assert_eq!(request.id, sent.id);
        assert_eq!(request.receiver_id, bodi);
        assert_eq!(request.sender.username, "john");

        // il mittente non riceve nulla
        assert!(get_user_notifications(&store, &john).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn accepted_request_leaves_the_inbox_but_the_row_stays() {
        let store = MemoryStore::with_users(&["john", "bodi"]);
        let (john, bodi) = (store.id("john"), store.id("bodi"));
        let sent = send_friend_request(&store, &john, &bodi).await.unwrap();

        accept_friend_request(&store, &sent.id).await.unwrap();

        assert!(get_user_notifications(&store, &bodi).await.unwrap().is_empty());
        // filtro in lettura: la riga non viene cancellata all'accept
        assert_eq!(store.notification_count(&bodi), 1);
    }

    #[tokio::test]
    async fn deleted_request_takes_its_notification_along() {
        let store = MemoryStore::with_users(&["john", "bodi"]);
        let (john, bodi) = (store.id("john"), store.id("bodi"));
        let sent = send_friend_request(&store, &john, &bodi).await.unwrap();

        delete_friend_request(&store, &sent.id).await.unwrap();

        assert!(get_user_notifications(&store, &bodi).await.unwrap().is_empty());
        assert_eq!(store.notification_count(&bodi), 0);
    }

    #[tokio::test]
    async fn group_invite_is_listed_until_accepted() {
        let store = MemoryStore::with_users(&["admin", "bob"]);
        let (admin, bob) = (store.id("admin"), store.id("bob"));
        let group = create_group(&store, "Rustaceans", &admin).await.unwrap();

        send_group_invite_to_users(&store, &group.id, &admin, &[bob.clone()])
            .await
            .unwrap();

        let inbox = get_user_notifications(&store, &bob).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].notification_type, NotificationType::GroupInvitation);
        assert!(inbox[0].friend_request.is_none());
        let invitation = inbox[0].group_chat_invitation.as_ref().unwrap();
        assert_eq!(invitation.id, group.id);
        assert_eq!(invitation.name, "Rustaceans");
        assert_eq!(invitation.admin.username, "admin");

        accept_group_invite(&store, &group.id, &bob).await.unwrap();
        assert!(get_user_notifications(&store, &bob).await.unwrap().is_empty());
        assert!(store.is_member_sync(&group.id, &bob));
    }

    #[tokio::test]
    async fn rejected_or_deleted_group_leaves_no_invitation() {
        let store = MemoryStore::with_users(&["admin", "bob", "carl"]);
        let (admin, bob, carl) = (store.id("admin"), store.id("bob"), store.id("carl"));
        let group = create_group(&store, "Rustaceans", &admin).await.unwrap();
        send_group_invite_to_users(&store, &group.id, &admin, &[bob.clone(), carl.clone()])
            .await
            .unwrap();

        reject_group_invite(&store, &group.id, &bob).await.unwrap();
        assert!(get_user_notifications(&store, &bob).await.unwrap().is_empty());
        assert_eq!(get_user_notifications(&store, &carl).await.unwrap().len(), 1);

        delete_group(&store, &group.id, &admin).await.unwrap();
        assert!(get_user_notifications(&store, &carl).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn entries_keep_storage_order() {
        let store = MemoryStore::with_users(&["admin", "john", "bob"]);
        let (admin, john, bob) = (store.id("admin"), store.id("john"), store.id("bob"));

        send_friend_request(&store, &john, &bob).await.unwrap();
        let group = create_group(&store, "Rustaceans", &admin).await.unwrap();
        send_group_invite_to_users(&store, &group.id, &admin, &[bob.clone()])
            .await
            .unwrap();

        let kinds: Vec<NotificationType> = get_user_notifications(&store, &bob)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.notification_type)
            .collect();
        assert_eq!(
            kinds,
            vec![NotificationType::FriendRequest, NotificationType::GroupInvitation]
        );
    }

    #[test]
    fn rows_missing_their_target_are_skipped() {
        let row = NotificationRow {
            id: "n1".to_string(),
            notification_type: NotificationType::GroupInvitation,
            created_at: chrono::Utc::now(),
            friendship_id: None,
            friendship_status: None,
            friendship_receiver_id: None,
            friendship_created_at: None,
            sender_id: None,
            sender_username: None,
            sender_image_url: None,
            group_id: None,
            group_name: None,
            group_created_at: None,
            admin_id: None,
            admin_username: None,
            admin_image_url: None,
        };
        assert!(project(vec![row]).is_empty());
    }
}
