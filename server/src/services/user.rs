//! User services - amici e utenti non ancora amici

use crate::core::{AppError, AppState};
use crate::dtos::{FriendsResponseDTO, NonFriendsResponseDTO, UserDTO};
use crate::engine::relationship::{get_anonymous_users, get_user_friends};
use crate::entities::User;
use axum::{
    Extension, Json,
    extract::State,
};
use std::sync::Arc;
use tracing::{debug, instrument};

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_friends(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<FriendsResponseDTO>, AppError> {
    let friends: Vec<UserDTO> = get_user_friends(&state.friendship, &current_user.id)
        .await?
        .into_iter()
        .map(UserDTO::from)
        .collect();

    debug!("Found {} friends", friends.len());
    Ok(Json(FriendsResponseDTO { friends }))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_anonymous(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<NonFriendsResponseDTO>, AppError> {
    let non_friends = get_anonymous_users(&state.friendship, &current_user.id).await?;

    debug!("Found {} non-friends", non_friends.len());
    Ok(Json(NonFriendsResponseDTO { non_friends }))
}

/// The authenticated user itself.
pub async fn get_me(Extension(current_user): Extension<User>) -> Json<UserDTO> {
    Json(UserDTO::from(current_user))
}
