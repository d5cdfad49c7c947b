//! Relationship engine - ciclo di vita delle richieste di amicizia

use super::{EngineError, sort_by_username};
use crate::dtos::CreateFriendshipDTO;
use crate::entities::{FriendRequestRecord, Friendship, FriendshipStatus, User, UserProfile};
use crate::repositories::{RelationshipStore, StoreError};
use tracing::{debug, info, instrument, warn};

pub const NOTHING_TO_UPDATE: &str = "Friend request not found, nothing to update.";
pub const NOTHING_TO_DELETE: &str = "Friend request not found, nothing to delete.";

fn already_sent(sender_username: &str) -> EngineError {
    EngineError::conflict(format!(
        "A friend request is already sent by {}",
        sender_username
    ))
}

/// The single record connecting two users, whichever of them sent it.
pub async fn get_friend_request_record<S: RelationshipStore>(
    store: &S,
    user_a: &str,
    user_b: &str,
) -> Result<Option<FriendRequestRecord>, EngineError> {
    Ok(store.find_between(user_a, user_b).await?)
}

/// Creates a PENDING request and the receiver's notification.
/// Any existing record between the two users, in either direction and any status, is a conflict.
#[instrument(skip(store))]
pub async fn send_friend_request<S: RelationshipStore>(
    store: &S,
    sender_id: &str,
    receiver_id: &str,
) -> Result<Friendship, EngineError> {
    if let Some(existing) = store.find_between(sender_id, receiver_id).await? {
        debug!(friendship_id = %existing.friendship.id, "Pair already has a record");
        return Err(already_sent(&existing.sender_username));
    }

    let data = CreateFriendshipDTO {
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
    };

    match store.create_pending(&data).await {
        Ok(friendship) => {
            info!(friendship_id = %friendship.id, "Friend request sent");
            Ok(friendship)
        }
        Err(StoreError::UniqueViolation(_)) => {
            // un'altra richiesta per la stessa coppia ha vinto la corsa
            warn!("Concurrent friend request for the same pair");
            match store.find_between(sender_id, receiver_id).await? {
                Some(existing) => Err(already_sent(&existing.sender_username)),
                None => Err(EngineError::conflict("A friend request already exists.")),
            }
        }
        Err(StoreError::ForeignKeyViolation(_)) => {
            Err(EngineError::unprocessable("Invalid user ID."))
        }
        Err(e) => Err(e.into()),
    }
}

/// Marks the request ACCEPTED. The notification is left in place: the inbox hides it
/// once the friendship is no longer PENDING.
#[instrument(skip(store))]
pub async fn accept_friend_request<S: RelationshipStore>(
    store: &S,
    friendship_id: &str,
) -> Result<Friendship, EngineError> {
    match store
        .set_status(friendship_id, FriendshipStatus::Accepted)
        .await
    {
        Ok(friendship) => Ok(friendship),
        Err(StoreError::NotFound) => Err(EngineError::not_found(NOTHING_TO_UPDATE)),
        Err(e) => Err(e.into()),
    }
}

/// Deletes the record, whatever its status. Its notification goes with it.
#[instrument(skip(store))]
pub async fn delete_friend_request<S: RelationshipStore>(
    store: &S,
    friendship_id: &str,
) -> Result<(), EngineError> {
    match store.delete_friendship(friendship_id).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(EngineError::not_found(NOTHING_TO_DELETE)),
        Err(e) => Err(e.into()),
    }
}

/// Friends of a user: senders of accepted requests it received, then receivers of
/// accepted requests it sent.
pub async fn get_user_friends<S: RelationshipStore>(
    store: &S,
    user_id: &str,
) -> Result<Vec<User>, EngineError> {
    let mut friends = store.accepted_senders_to(user_id).await?;
    friends.extend(store.accepted_receivers_from(user_id).await?);
    Ok(friends)
}

/// Everyone except the user and its accepted friends, sorted by username.
pub async fn get_anonymous_users<S: RelationshipStore>(
    store: &S,
    user_id: &str,
) -> Result<Vec<UserProfile>, EngineError> {
    let mut users = store.non_friends_of(user_id).await?;
    users.retain(|u| u.id != user_id);
    sort_by_username(&mut users);
    Ok(users)
}
