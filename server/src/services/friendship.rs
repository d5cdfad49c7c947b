//! Friendship services - richieste di amicizia

use crate::core::{AppError, AppState, ValidJson};
use crate::dtos::{
    CreateFriendRequestDTO, FriendRequestSentDTO, FriendshipDTO, FriendshipResponseDTO,
};
use crate::engine::relationship::{
    self, NOTHING_TO_DELETE, NOTHING_TO_UPDATE, accept_friend_request, delete_friend_request,
    send_friend_request,
};
use crate::entities::User;
use crate::repositories::RelationshipStore;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.id))]
pub async fn create_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    ValidJson(body): ValidJson<CreateFriendRequestDTO>,
) -> Result<(StatusCode, Json<FriendRequestSentDTO>), AppError> {
    // 1. senderId, se presente, deve essere l'utente autenticato
    // 2. niente richieste a se stessi
    // 3. il destinatario deve esistere (serve il suo username per la risposta)
    // 4. l'engine controlla la coppia e crea richiesta + notifica

    if let Some(sender_id) = &body.sender_id {
        if *sender_id != current_user.id {
            return Err(AppError::forbidden(
                "You can only send friend requests on your own behalf.",
            ));
        }
    }

    if body.receiver_id == current_user.id {
        return Err(AppError::bad_request(
            "You cannot send a friend request to yourself.",
        ));
    }

    let receiver = state
        .user
        .find_by_id(&body.receiver_id)
        .await?
        .ok_or_else(|| AppError::unprocessable_entity("Invalid user ID."))?;

    let friendship = send_friend_request(&state.friendship, &current_user.id, &receiver.id).await?;

    info!(friendship_id = %friendship.id, "Friend request created");
    Ok((
        StatusCode::CREATED,
        Json(FriendRequestSentDTO {
            message: format!("Friend request sent to {}", receiver.username),
            friend_request: FriendshipDTO::from(friendship),
        }),
    ))
}

/// Only the receiver can accept.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn accept_friendship(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(friendship_id): Path<String>,
) -> Result<Json<FriendshipResponseDTO>, AppError> {
    let pending = state
        .friendship
        .find_friendship(&friendship_id)
        .await?
        .ok_or_else(|| AppError::not_found(NOTHING_TO_UPDATE))?;

    if pending.receiver_id != current_user.id {
        debug!("Caller is not the receiver");
        return Err(AppError::forbidden(
            "You do not have permission to accept this friend request.",
        ));
    }

    let friendship = accept_friend_request(&state.friendship, &friendship_id).await?;

    Ok(Json(FriendshipResponseDTO {
        friendship: FriendshipDTO::from(friendship),
    }))
}

/// Sender or receiver can delete, at any status.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn delete_friendship(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(friendship_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let friendship = state
        .friendship
        .find_friendship(&friendship_id)
        .await?
        .ok_or_else(|| AppError::not_found(NOTHING_TO_DELETE))?;

    if !friendship.involves(&current_user.id) {
        return Err(AppError::forbidden(
            "You do not have permission to delete this friend request.",
        ));
    }

    delete_friend_request(&state.friendship, &friendship_id).await?;

    info!("Friendship deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /friendships/with/{userId}`: the record between the caller and another user, if any.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_friendship_with(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(other_id): Path<String>,
) -> Result<Json<FriendshipResponseDTO>, AppError> {
    let record =
        relationship::get_friend_request_record(&state.friendship, &current_user.id, &other_id)
            .await?
            .ok_or_else(|| AppError::not_found("Friend request not found."))?;

    Ok(Json(FriendshipResponseDTO {
        friendship: FriendshipDTO::from(record.friendship),
    }))
}
