//! Group engine - membri, inviti e permessi dell'admin

use super::{EngineError, sort_by_username};
use crate::dtos::CreateGroupDTO;
use crate::entities::{GroupChat, Notification, UserProfile};
use crate::repositories::{GroupStore, StoreError};
use tracing::{debug, info, instrument};

pub const GROUP_NOT_FOUND: &str = "Group not found.";

/// A group with its members (username ascending) and its admin.
#[derive(Debug, Clone)]
pub struct GroupWithMembers {
    pub group: GroupChat,
    pub members: Vec<UserProfile>,
    pub admin: UserProfile,
}

/// Reads the group and checks that `requester` is its admin.
async fn group_administered_by<S: GroupStore>(
    store: &S,
    group_id: &str,
    requester_id: &str,
    not_found: &str,
    forbidden: &str,
) -> Result<GroupChat, EngineError> {
    let group = store
        .find_group(group_id)
        .await?
        .ok_or_else(|| EngineError::not_found(not_found))?;

    if !group.is_admin(requester_id) {
        debug!(group_id, requester_id, "Requester is not the admin");
        return Err(EngineError::forbidden(forbidden));
    }

    Ok(group)
}

#[instrument(skip(store))]
pub async fn create_group<S: GroupStore>(
    store: &S,
    name: &str,
    admin_id: &str,
) -> Result<GroupChat, EngineError> {
    let data = CreateGroupDTO {
        name: name.to_string(),
        admin_id: admin_id.to_string(),
    };
    Ok(store.create_group(&data).await?)
}

pub async fn get_group_with_members<S: GroupStore>(
    store: &S,
    group_id: &str,
) -> Result<Option<GroupWithMembers>, EngineError> {
    let Some(group) = store.find_group(group_id).await? else {
        return Ok(None);
    };

    let mut members = store.members_of(group_id).await?;
    sort_by_username(&mut members);
    let admin = store
        .admin_of(group_id)
        .await?
        .ok_or(StoreError::NotFound)?;

    Ok(Some(GroupWithMembers {
        group,
        members,
        admin,
    }))
}

/// Invites every target to the group in one batch. Repeated ids count once.
#[instrument(skip(store, target_ids), fields(targets = target_ids.len()))]
pub async fn send_group_invite_to_users<S: GroupStore>(
    store: &S,
    group_id: &str,
    requester_id: &str,
    target_ids: &[String],
) -> Result<Vec<Notification>, EngineError> {
    let group = group_administered_by(
        store,
        group_id,
        requester_id,
        GROUP_NOT_FOUND,
        "You do not have permission to invite users to this group.",
    )
    .await?;

    let mut targets: Vec<String> = Vec::with_capacity(target_ids.len());
    for id in target_ids {
        if !targets.contains(id) {
            targets.push(id.clone());
        }
    }

    if targets.iter().any(|id| group.is_admin(id)) {
        return Err(EngineError::unprocessable(
            "You cannot invite yourself to this group.",
        ));
    }

    match store.create_invitations(group_id, &targets).await {
        Ok(created) => {
            info!(count = created.len(), "Group invitations sent");
            Ok(created)
        }
        Err(StoreError::ForeignKeyViolation(_)) => {
            Err(EngineError::unprocessable("Invalid user ID."))
        }
        Err(StoreError::UniqueViolation(_)) => Err(EngineError::conflict(
            "A user has already been invited to this group.",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Turns the invitation into a membership.
#[instrument(skip(store))]
pub async fn accept_group_invite<S: GroupStore>(
    store: &S,
    group_id: &str,
    user_id: &str,
) -> Result<(), EngineError> {
    if !store.has_invitation(group_id, user_id).await? {
        return Err(EngineError::not_found("No invite found to accept."));
    }

    match store.accept_invitation(group_id, user_id).await {
        Ok(()) => Ok(()),
        // consumato da una richiesta concorrente
        Err(StoreError::NotFound) => Err(EngineError::not_found("No invite found to accept.")),
        Err(e) => Err(e.into()),
    }
}

/// Drops the invitation. Membership is left untouched.
#[instrument(skip(store))]
pub async fn reject_group_invite<S: GroupStore>(
    store: &S,
    group_id: &str,
    user_id: &str,
) -> Result<(), EngineError> {
    match store.delete_invitation(group_id, user_id).await {
        Ok(()) => Ok(()),
        Err(StoreError::NotFound) => Err(EngineError::not_found("No invite found to reject.")),
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(store))]
pub async fn update_group_name<S: GroupStore>(
    store: &S,
    group_id: &str,
    requester_id: &str,
    name: &str,
) -> Result<GroupChat, EngineError> {
    group_administered_by(
        store,
        group_id,
        requester_id,
        GROUP_NOT_FOUND,
        "You do not have permission to update this group name.",
    )
    .await?;

    match store.rename_group(group_id, name).await {
        Ok(group) => Ok(group),
        Err(StoreError::NotFound) => Err(EngineError::not_found(GROUP_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// The admin may remove anyone; a member may only remove itself.
#[instrument(skip(store))]
pub async fn remove_group_member<S: GroupStore>(
    store: &S,
    group_id: &str,
    member_id: &str,
    requester_id: &str,
) -> Result<(), EngineError> {
    let group = store
        .find_group(group_id)
        .await?
        .ok_or_else(|| EngineError::not_found("Group not found"))?;

    if !group.is_admin(requester_id) && requester_id != member_id {
        return Err(EngineError::forbidden(
            "You do not have permission to remove this member.",
        ));
    }

    store.remove_member(group_id, member_id).await?;
    Ok(())
}

#[instrument(skip(store))]
pub async fn delete_group<S: GroupStore>(
    store: &S,
    group_id: &str,
    requester_id: &str,
) -> Result<(), EngineError> {
    group_administered_by(
        store,
        group_id,
        requester_id,
        GROUP_NOT_FOUND,
        "You do not have permission to delete this group.",
    )
    .await?;

    match store.delete_group(group_id).await {
        Ok(()) => {
            info!("Group deleted");
            Ok(())
        }
        Err(StoreError::NotFound) => Err(EngineError::not_found(GROUP_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// Groups the user administers or belongs to, in storage order.
pub async fn get_user_groups<S: GroupStore>(
    store: &S,
    user_id: &str,
) -> Result<Vec<GroupChat>, EngineError> {
    Ok(store.groups_for(user_id).await?)
}

/// Admin or member: the users allowed to read and post group messages.
pub async fn can_participate<S: GroupStore>(
    store: &S,
    group: &GroupChat,
    user_id: &str,
) -> Result<bool, EngineError> {
    if group.is_admin(user_id) {
        return Ok(true);
    }
    Ok(store.is_member(&group.id, user_id).await?)
}
