//! Group services - chat di gruppo, inviti e membri

use crate::core::{AppError, AppState, ValidJson};
use crate::dtos::{
    GroupDTO, GroupNameDTO, GroupResponseDTO, GroupWithMembersDTO, GroupsResponseDTO,
    InviteUsersDTO,
};
use crate::engine::group::{
    self, accept_group_invite, get_group_with_members, get_user_groups, reject_group_invite,
    remove_group_member, send_group_invite_to_users, update_group_name,
};
use crate::entities::User;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<GroupsResponseDTO>, AppError> {
    let groups: Vec<GroupDTO> = get_user_groups(&state.group, &current_user.id)
        .await?
        .into_iter()
        .map(GroupDTO::from)
        .collect();

    debug!("Found {} groups", groups.len());
    Ok(Json(GroupsResponseDTO { groups }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ValidJson(body): ValidJson<GroupNameDTO>,
) -> Result<(StatusCode, Json<GroupResponseDTO<GroupDTO>>), AppError> {
    let created = group::create_group(&state.group, &body.group_name, &current_user.id).await?;

    info!(group_id = %created.id, "Group created");
    Ok((
        StatusCode::CREATED,
        Json(GroupResponseDTO {
            group: GroupDTO::from(created),
        }),
    ))
}

#[instrument(skip(state, _current_user))]
pub async fn get_group(
    State(state): State<Arc<AppState>>,
    Extension(_current_user): Extension<User>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupResponseDTO<GroupWithMembersDTO>>, AppError> {
    let view = get_group_with_members(&state.group, &group_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(
                "Group not found! it may have been moved, deleted or it might have never existed.",
            )
        })?;

    Ok(Json(GroupResponseDTO {
        group: GroupWithMembersDTO {
            id: view.group.id,
            name: view.group.name,
            created_at: view.group.created_at,
            users: view.members,
            admin: view.admin,
        },
    }))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn rename_group(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
    ValidJson(body): ValidJson<GroupNameDTO>,
) -> Result<Json<GroupResponseDTO<GroupDTO>>, AppError> {
    let renamed =
        update_group_name(&state.group, &group_id, &current_user.id, &body.group_name).await?;

    Ok(Json(GroupResponseDTO {
        group: GroupDTO::from(renamed),
    }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, AppError> {
    group::delete_group(&state.group, &group_id, &current_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn invite_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
    ValidJson(body): ValidJson<InviteUsersDTO>,
) -> Result<StatusCode, AppError> {
    send_group_invite_to_users(&state.group, &group_id, &current_user.id, &body.user_ids).await?;
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn accept_invite(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, AppError> {
    accept_group_invite(&state.group, &group_id, &current_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn reject_invite(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, AppError> {
    reject_group_invite(&state.group, &group_id, &current_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path((group_id, member_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    remove_group_member(&state.group, &group_id, &member_id, &current_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
