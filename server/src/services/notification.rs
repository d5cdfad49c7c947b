//! Notification services - inbox dell'utente

use crate::core::{AppError, AppState};
use crate::dtos::NotificationsResponseDTO;
use crate::engine::notification::get_user_notifications;
use crate::entities::User;
use axum::{Extension, Json, extract::State};
use std::sync::Arc;
use tracing::instrument;

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_my_notifications(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<NotificationsResponseDTO>, AppError> {
    let notifications = get_user_notifications(&state.notification, &current_user.id).await?;
    Ok(Json(NotificationsResponseDTO { notifications }))
}
