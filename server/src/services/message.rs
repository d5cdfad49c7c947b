//! Message services - messaggi diretti e di gruppo (multipart con immagine opzionale)

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateMessageDTO, MessageDTO, MessageResponseDTO, MessageTarget, MessagesResponseDTO,
};
use crate::engine::group::{GROUP_NOT_FOUND, can_participate};
use crate::entities::{GroupChat, User};
use crate::media::MediaStore;
use crate::repositories::{GroupStore, StoreError};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

const CONTENT_FIELD: &str = "messageContent";
const IMAGE_FIELD: &str = "image";

struct Upload {
    content_type: String,
    data: Vec<u8>,
}

/// Reads `messageContent` and the optional `image` part. Other parts are ignored.
async fn read_form(
    mut multipart: Multipart,
    media: &MediaStore,
) -> Result<(String, Option<Upload>), AppError> {
    let mut content = String::new();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some(CONTENT_FIELD) => {
                content = field.text().await?.trim().to_string();
            }
            Some(IMAGE_FIELD) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                // file input vuoto: nessuna immagine
                if data.is_empty() {
                    continue;
                }
                media.check(&content_type, data.len())?;
                upload = Some(Upload {
                    content_type,
                    data: data.to_vec(),
                });
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok((content, upload))
}

/// Validates, stores the image if any, then stores the message.
async fn post_message(
    state: &AppState,
    sender: &User,
    target: MessageTarget,
    multipart: Multipart,
) -> Result<MessageDTO, AppError> {
    let (content, upload) = read_form(multipart, &state.media).await?;

    let mut new_message = CreateMessageDTO {
        content,
        image_url: None,
        sender_id: sender.id.clone(),
        target,
    };
    new_message.validate()?;

    if let Some(upload) = upload {
        let url = state
            .media
            .store_image(&upload.content_type, &upload.data)
            .await?;
        new_message.image_url = Some(url);
    }

    let message = match state.msg.create(&new_message).await {
        Ok(message) => message,
        Err(err) => {
            // nessun messaggio salvato: l'immagine resterebbe orfana
            if let Some(url) = &new_message.image_url {
                if let Err(e) = state.media.remove_image(url).await {
                    warn!(url = %url, "Failed to remove orphaned image: {}", e);
                }
            }
            return Err(message_store_error(err, &new_message.target));
        }
    };

    info!(message_id = %message.id, "Message sent");
    Ok(MessageDTO::from(message))
}

/// A foreign key failure here means the target vanished after it was checked.
fn message_store_error(err: StoreError, target: &MessageTarget) -> AppError {
    match (err, target) {
        (StoreError::ForeignKeyViolation(_), MessageTarget::User(_)) => {
            AppError::not_found("Cannot find user to send message to.")
        }
        (StoreError::ForeignKeyViolation(_), MessageTarget::Group(_)) => {
            AppError::not_found(GROUP_NOT_FOUND)
        }
        (err, _) => err.into(),
    }
}

/// The group, if the caller is its admin or a member.
async fn participating_group(
    state: &AppState,
    group_id: &str,
    user: &User,
) -> Result<GroupChat, AppError> {
    let group = state
        .group
        .find_group(group_id)
        .await?
        .ok_or_else(|| AppError::not_found(GROUP_NOT_FOUND))?;

    if !can_participate(&state.group, &group, &user.id).await? {
        return Err(AppError::forbidden(
            "You do not have permission to access this group's messages.",
        ));
    }

    Ok(group)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_direct_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(other_id): Path<String>,
) -> Result<Json<MessagesResponseDTO>, AppError> {
    if !state.user.exists(&other_id).await? {
        return Err(AppError::not_found("User not found."));
    }

    let messages = state
        .msg
        .between_users(&current_user.id, &other_id)
        .await?
        .into_iter()
        .map(MessageDTO::from)
        .collect();

    Ok(Json(MessagesResponseDTO { messages }))
}

#[debug_handler]
#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.id))]
pub async fn send_direct_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(receiver_id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponseDTO>), AppError> {
    if !state.user.exists(&receiver_id).await? {
        return Err(AppError::not_found("Cannot find user to send message to."));
    }

    let message = post_message(
        &state,
        &current_user,
        MessageTarget::User(receiver_id),
        multipart,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(MessageResponseDTO { message })))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn get_group_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
) -> Result<Json<MessagesResponseDTO>, AppError> {
    let group = participating_group(&state, &group_id, &current_user).await?;

    let messages = state
        .msg
        .in_group(&group.id)
        .await?
        .into_iter()
        .map(MessageDTO::from)
        .collect();

    Ok(Json(MessagesResponseDTO { messages }))
}

#[debug_handler]
#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.id))]
pub async fn send_group_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(group_id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MessageResponseDTO>), AppError> {
    let group = participating_group(&state, &group_id, &current_user).await?;

    let message = post_message(
        &state,
        &current_user,
        MessageTarget::Group(group.id),
        multipart,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(MessageResponseDTO { message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanished_targets_are_not_found() {
        let user = message_store_error(
            StoreError::ForeignKeyViolation("receiver_id".into()),
            &MessageTarget::User("u".into()),
        );
        assert_eq!(user.status(), StatusCode::NOT_FOUND);
        assert_eq!(user.messages(), ["Cannot find user to send message to."]);

        let group = message_store_error(
            StoreError::ForeignKeyViolation("group_chat_id".into()),
            &MessageTarget::Group("g".into()),
        );
        assert_eq!(group.status(), StatusCode::NOT_FOUND);
        assert_eq!(group.messages(), [GROUP_NOT_FOUND]);
    }

    #[test]
    fn other_store_errors_keep_their_mapping() {
        let err = message_store_error(StoreError::NotFound, &MessageTarget::User("u".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.messages(), ["Resource not found"]);
    }
}
