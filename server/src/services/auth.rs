//! Auth services - Gestione autenticazione e registrazione utenti

use crate::core::auth::{guest_token_ttl, user_token_ttl};
use crate::core::{AppError, AppState, ValidJson, encode_jwt};
use crate::dtos::{AuthResponseDTO, CreateUserDTO, LogInDTO, SignUpDTO, UserDTO};
use crate::entities::{GUEST_USERNAME, User};
use crate::repositories::StoreError;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<SignUpDTO>,
) -> Result<(StatusCode, Json<AuthResponseDTO>), AppError> {
    // 1. Validazione già fatta da ValidJson (username trimmato, lunghezze, conferma password)
    // 2. Hash della password
    // 3. Inserimento: username duplicato -> CONFLICT
    // 4. Token a lunga durata + utente senza password

    let password_hash = User::hash_password(&body.password)?;

    let new_user = CreateUserDTO {
        username: body.username,
        password: password_hash,
        is_guest: false,
    };

    let user = match state.user.create(&new_user).await {
        Ok(user) => user,
        Err(StoreError::UniqueViolation(_)) => {
            debug!("Username already taken");
            return Err(AppError::conflict("A user with this username already exists."));
        }
        Err(e) => return Err(e.into()),
    };

    let token = encode_jwt(&user.id, user_token_ttl(), &state.jwt_secret)?;

    info!(user_id = %user.id, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponseDTO {
            token,
            user: UserDTO::from(user),
        }),
    ))
}

#[instrument(skip(state, body), fields(username = %body.username))]
pub async fn log_in(
    State(state): State<Arc<AppState>>,
    ValidJson(body): ValidJson<LogInDTO>,
) -> Result<Json<AuthResponseDTO>, AppError> {
    let invalid = || AppError::unauthorized("Incorrect username or password.");

    let user = state
        .user
        .find_by_username(&body.username)
        .await?
        .ok_or_else(invalid)?;

    // L'account guest passa solo da /auth/guest (token da 30 minuti)
    if user.is_guest {
        warn!("Password log-in attempted on the guest account");
        return Err(invalid());
    }

    if !user.verify_password(&body.password) {
        warn!("Wrong password");
        return Err(invalid());
    }

    let user = state.user.touch_last_seen(&user.id).await?;
    let token = encode_jwt(&user.id, user_token_ttl(), &state.jwt_secret)?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(AuthResponseDTO {
        token,
        user: UserDTO::from(user),
    }))
}

/// Logs in as the shared guest account, creating it the first time.
#[instrument(skip(state))]
pub async fn guest(State(state): State<Arc<AppState>>) -> Result<Json<AuthResponseDTO>, AppError> {
    // Password casuale: l'account guest non è raggiungibile via log-in
    let guest = CreateUserDTO {
        username: GUEST_USERNAME.to_string(),
        password: User::hash_password(&Uuid::new_v4().to_string())?,
        is_guest: true,
    };

    let user = state.user.get_or_create_guest(&guest).await?;
    if !user.is_guest {
        error!(user_id = %user.id, "Guest username is held by a regular account");
        return Err(AppError::conflict("Guest account is unavailable."));
    }
    let user = state.user.touch_last_seen(&user.id).await?;
    let token = encode_jwt(&user.id, guest_token_ttl(), &state.jwt_secret)?;

    info!(user_id = %user.id, "Guest logged in");
    Ok(Json(AuthResponseDTO {
        token,
        user: UserDTO::from(user),
    }))
}
