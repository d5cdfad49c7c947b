//! Store traits
//!
//! Interfaces the engine is written against. The MySQL repositories implement them;
//! the engine tests implement them in memory.

use super::StoreError;
use crate::dtos::{CreateFriendshipDTO, CreateGroupDTO};
use crate::entities::{
    FriendRequestRecord, Friendship, FriendshipStatus, GroupChat, Notification, NotificationRow,
    User, UserProfile,
};

/// Friend requests and the friendships they turn into.
pub trait RelationshipStore {
    /// Reads the record between two users, whichever direction it was sent in.
    ///
    /// # Returns
    /// * `Ok(Some(record))` - record found, with the sender's username
    /// * `Ok(None)` - the two users have no record
    async fn find_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequestRecord>, StoreError>;

    async fn find_friendship(&self, id: &str) -> Result<Option<Friendship>, StoreError>;

    /// Creates a PENDING friendship and the receiver's FRIEND_REQUEST notification
    /// as one unit.
    ///
    /// # Errors
    /// * `UniqueViolation` - the pair already has a record
    /// * `ForeignKeyViolation` - one of the users does not exist
    async fn create_pending(&self, data: &CreateFriendshipDTO) -> Result<Friendship, StoreError>;

    /// Sets the status of a friendship. `NotFound` if the id is unknown.
    async fn set_status(&self, id: &str, status: FriendshipStatus)
    -> Result<Friendship, StoreError>;

    /// Deletes a friendship and its notification. `NotFound` if the id is unknown.
    async fn delete_friendship(&self, id: &str) -> Result<(), StoreError>;

    /// Senders of ACCEPTED friendships received by `user_id`.
    async fn accepted_senders_to(&self, user_id: &str) -> Result<Vec<User>, StoreError>;

    /// Receivers of ACCEPTED friendships sent by `user_id`.
    async fn accepted_receivers_from(&self, user_id: &str) -> Result<Vec<User>, StoreError>;

    /// Every other user without an ACCEPTED friendship with `user_id`.
    async fn non_friends_of(&self, user_id: &str) -> Result<Vec<UserProfile>, StoreError>;
}

/// Group chats, their members and pending invitations.
pub trait GroupStore {
    async fn create_group(&self, data: &CreateGroupDTO) -> Result<GroupChat, StoreError>;

    async fn find_group(&self, group_id: &str) -> Result<Option<GroupChat>, StoreError>;

    async fn members_of(&self, group_id: &str) -> Result<Vec<UserProfile>, StoreError>;

    async fn admin_of(&self, group_id: &str) -> Result<Option<UserProfile>, StoreError>;

    async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError>;

    /// Groups where the user is admin or member.
    async fn groups_for(&self, user_id: &str) -> Result<Vec<GroupChat>, StoreError>;

    /// Creates one GROUP_INVITATION per user, all or nothing.
    ///
    /// # Errors
    /// * `UniqueViolation` - a user already has an invitation to this group
    /// * `ForeignKeyViolation` - a user does not exist
    async fn create_invitations(
        &self,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<Notification>, StoreError>;

    async fn has_invitation(&self, group_id: &str, user_id: &str) -> Result<bool, StoreError>;

    /// Consumes the invitation and adds the user to the members, as one unit.
    /// `NotFound` if there is no invitation.
    async fn accept_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError>;

    /// Deletes the invitation. `NotFound` if there is none.
    async fn delete_invitation(&self, group_id: &str, user_id: &str) -> Result<(), StoreError>;

    async fn rename_group(&self, group_id: &str, name: &str) -> Result<GroupChat, StoreError>;

    /// Removes a member. Removing a non-member is a no-op.
    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), StoreError>;

    /// Deletes the group with its members, invitations and messages.
    async fn delete_group(&self, group_id: &str) -> Result<(), StoreError>;
}

/// Read side of the notification inbox.
pub trait NotificationStore {
    /// All notification rows of a user joined with their targets, oldest first.
    async fn rows_for_user(&self, user_id: &str) -> Result<Vec<NotificationRow>, StoreError>;
}
