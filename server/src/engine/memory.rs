//! In-memory store for the engine tests. Mirrors the database constraints the engine
//! relies on: pair uniqueness, foreign keys, invitation uniqueness and cascades.

use crate::dtos::{CreateFriendshipDTO, CreateGroupDTO};
use crate::entities::{
    FriendRequestRecord, Friendship, FriendshipStatus, GroupChat, Notification, NotificationRow,
    NotificationType, User, UserProfile,
};
use crate::repositories::{GroupStore, NotificationStore, RelationshipStore, StoreError};
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: Vec<User>,
    friendships: Vec<Friendship>,
    groups: Vec<GroupChat>,
    members: Vec<(String, String)>,
    notifications: Vec<Notification>,
    ticks: i64,
    hide_next_lookup: bool,
}

impl State {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(self.ticks)
    }

    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}

pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn with_users(usernames: &[&str]) -> Self {
        let mut state = State::default();
        for name in usernames {
            let now = state.now();
            state.users.push(User {
                id: format!("id-{}", name),
                username: name.to_string(),
                password: "hash".to_string(),
                image_url: None,
                is_guest: false,
                last_seen: now,
                created_at: now,
            });
        }
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn id(&self, username: &str) -> String {
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.id.clone())
            .unwrap()
    }

    /// Makes the next `find_between` miss, as if a concurrent insert landed after the check.
    pub fn hide_friendships_on_next_lookup(&self) {
        self.state.lock().unwrap().hide_next_lookup = true;
    }

    pub fn invitation_count(&self, group_id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .notifications
            .iter()
            .filter(|n| n.group_chat_id.as_deref() == Some(group_id))
            .count()
    }

    pub fn notification_count(&self, user_id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.notifications.iter().filter(|n| n.user_id == user_id).count()
    }

    pub fn is_member_sync(&self, group_id: &str, user_id: &str) -> bool {
        let state = self.state.lock().unwrap();
        state
            .members
            .iter()
            .any(|(g, u)| g == group_id && u == user_id)
    }
}

impl RelationshipStore for MemoryStore {
    async fn find_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRecord>, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.hide_next_lookup {
            state.hide_next_lookup = false;
            return Ok(None);
        }

        let key = Friendship::pair_key(user_a, user_b);
        let record = state
            .friendships
            .iter()
            .find(|f| Friendship::pair_key(&f.sender_id, &f.receiver_id) == key)
            .map(|f| FriendRequestRecord {
                friendship: f.clone(),
                sender_username: state
                    .user(&f.sender_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
            });
        Ok(record)
    }

    async fn find_friendship(&self, id: &str) -> Result<Option<Friendship>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.friendships.iter().find(|f| f.id == id).cloned())
    }

    async fn create_pending(&self, data: &CreateFriendshipDTO) -> Result<Friendship, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.user(&data.sender_id).is_none() || state.user(&data.receiver_id).is_none() {
            return Err(StoreError::ForeignKeyViolation("friendships".to_string()));
        }

        let key = Friendship::pair_key(&data.sender_id, &data.receiver_id);
        if state
            .friendships
            .iter()
            .any(|f| Friendship::pair_key(&f.sender_id, &f.receiver_id) == key)
        {
            return Err(StoreError::UniqueViolation("friendships_pair_key".to_string()));
        }

        let now = state.now();
        let friendship = Friendship {
            id: Uuid::new_v4().to_string(),
            sender_id: data.sender_id.clone(),
            receiver_id: data.receiver_id.clone(),
            status: FriendshipStatus::Pending,
            created_at: now,
        };
        state.notifications.push(Notification {
            id: Uuid::new_v4().to_string(),
            user_id: data.receiver_id.clone(),
            notification_type: NotificationType::FriendRequest,
            friendship_id: Some(friendship.id.clone()),
            group_chat_id: None,
            created_at: now,
        });
        state.friendships.push(friendship.clone());
        Ok(friendship)
    }

    async fn set_status(
        &self,
        id: &str,
        status: FriendshipStatus,
    ) -> Result<Friendship, StoreError> {
        let mut state = self.state.lock().unwrap();
        let friendship = state
            .friendships
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(StoreError::NotFound)?;
        friendship.status = status;
        Ok(friendship.clone())
    }

    async fn delete_friendship(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.friendships.len();
        state.friendships.retain(|f| f.id != id);
        if state.friendships.len() == before {
            return Err(StoreError::NotFound);
        }
        state
            .notifications
            .retain(|n| n.friendship_id.as_deref() != Some(id));
        Ok(())
    }

    async fn accepted_senders_to(&self, user_id: &str) -> Result<Vec<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .friendships
            .iter()
            .filter(|f| f.receiver_id == user_id && f.status == FriendshipStatus::Accepted)
            .filter_map(|f| state.user(&f.sender_id).cloned())
            .collect())
    }

    async fn accepted_receivers_from(&self, user_id: &str) -> Result<Vec<User>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .friendships
            .iter()
            .filter(|f| f.sender_id == user_id && f.status == FriendshipStatus::Accepted)
            .filter_map(|f| state.user(&f.receiver_id).cloned())
            .collect())
    }

    async fn non_friends_of(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| u.id != user_id)
            .filter(|u| {
                !state.friendships.iter().any(|f| {
                    f.status == FriendshipStatus::Accepted
                        && f.involves(user_id)
                        && f.involves(&u.id)
                })
            })
            .map(UserProfile::from)
            .collect())
    }
}

impl GroupStore for MemoryStore {
    async fn create_group(&self, data: &CreateGroupDTO) -> Result<GroupChat, StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.user(&data.admin_id).is_none() {
            return Err(StoreError::ForeignKeyViolation("group_chats".to_string()));
        }
        let group = GroupChat {
            id: Uuid::new_v4().to_string(),
            name: data.name.clone(),
            admin_id: data.admin_id.clone(),
            created_at: state.now(),
        };
        state.groups.push(group.clone());
        Ok(group)
    }

    async fn find_group(&self, group_id: &str) -> Result<Option<GroupChat>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state.groups.iter().find(|g| g.id == group_id).cloned())
    }

    async fn members_of(&self, group_id: &str) -> Result<Vec<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|(g, _)| g == group_id)
            .filter_map(|(_, u)| state.user(u).map(UserProfile::from))
            .collect())
    }

    async fn admin_of(&self, group_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .and_then(|g| state.user(&g.admin_id))
            .map(UserProfile::from))
    }

    async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.is_member_sync(group_id, user_id))
    }

    async fn groups_for(&self, user_id: &str) -> Result<Vec<GroupChat>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .groups
            .iter()
            .filter(|g| {
                g.admin_id == user_id
                    || state
                        .members
                        .iter()
                        .any(|(group, user)| *group == g.id && user == user_id)
            })
            .cloned()
            .collect())
    }

    async fn create_invitations(
        &self,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<Notification>, StoreError> {
        let mut state = self.state.lock().unwrap();

        // validazione completa prima di scrivere: tutto o niente
        for (i, user_id) in user_ids.iter().enumerate() {
            if state.user(user_id).is_none() {
                return Err(StoreError::ForeignKeyViolation("notifications".to_string()));
            }
            let already = state.notifications.iter().any(|n| {
                n.user_id == *user_id && n.group_chat_id.as_deref() == Some(group_id)
            });
            if already || user_ids[..i].contains(user_id) {
                return Err(StoreError::UniqueViolation(
                    "notifications_user_group_key".to_string(),
                ));
            }
        }

        let now = state.now();
        let created: Vec<Notification> = user_ids
            .iter()
            .map(|user_id| Notification {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                notification_type: NotificationType::GroupInvitation,
                friendship_id: None,
                group_chat_id: Some(group_id.to_string()),
                created_at: now,
            })
            .collect();
        state.notifications.extend(created.iter().cloned());
        Ok(created)
    }

    async fn has_invitation(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .any(|n| n.user_id == user_id && n.group_chat_id.as_deref() == Some(group_id)))
    }

    async fn accept_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        self.delete_invitation(group_id, user_id).await?;
        let mut state = self.state.lock().unwrap();
        let pair = (group_id.to_string(), user_id.to_string());
        if !state.members.contains(&pair) {
            state.members.push(pair);
        }
        Ok(())
    }

    async fn delete_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.user_id == user_id && n.group_chat_id.as_deref() == Some(group_id)));
        if state.notifications.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupChat, StoreError> {
        let mut state = self.state.lock().unwrap();
        let group = state
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or(StoreError::NotFound)?;
        group.name = name.to_string();
        Ok(group.clone())
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .members
            .retain(|(g, u)| !(g == group_id && u == user_id));
        Ok(())
    }

    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.groups.len();
        state.groups.retain(|g| g.id != group_id);
        if state.groups.len() == before {
            return Err(StoreError::NotFound);
        }
        state.members.retain(|(g, _)| g != group_id);
        state
            .notifications
            .retain(|n| n.group_chat_id.as_deref() != Some(group_id));
        Ok(())
    }
}

impl NotificationStore for MemoryStore {
    async fn rows_for_user(&self, user_id: &str) -> Result<Vec<NotificationRow>, StoreError> {
        let state = self.state.lock().unwrap();
        let rows = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| {
                let friendship = n
                    .friendship_id
                    .as_deref()
                    .and_then(|id| state.friendships.iter().find(|f| f.id == id));
                let sender = friendship.and_then(|f| state.user(&f.sender_id));
                let group = n
                    .group_chat_id
                    .as_deref()
                    .and_then(|id| state.groups.iter().find(|g| g.id == id));
                let admin = group.and_then(|g| state.user(&g.admin_id));

                NotificationRow {
                    id: n.id.clone(),
                    notification_type: n.notification_type,
                    created_at: n.created_at,
                    friendship_id: friendship.map(|f| f.id.clone()),
                    friendship_status: friendship.map(|f| f.status),
                    friendship_receiver_id: friendship.map(|f| f.receiver_id.clone()),
                    friendship_created_at: friendship.map(|f| f.created_at),
                    sender_id: sender.map(|u| u.id.clone()),
                    sender_username: sender.map(|u| u.username.clone()),
                    sender_image_url: sender.and_then(|u| u.image_url.clone()),
                    group_id: group.map(|g| g.id.clone()),
                    group_name: group.map(|g| g.name.clone()),
                    group_created_at: group.map(|g| g.created_at),
                    admin_id: admin.map(|u| u.id.clone()),
                    admin_username: admin.map(|u| u.username.clone()),
                    admin_image_url: admin.and_then(|u| u.image_url.clone()),
                }
            })
            .collect();
        Ok(rows)
    }
}
