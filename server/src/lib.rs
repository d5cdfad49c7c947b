//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod engine;
pub mod entities;
pub mod media;
pub mod repositories;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, header},
    middleware,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Spazio per i campi testuali del multipart oltre all'immagine
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .nest("/friendships", configure_friendship_routes(state.clone()))
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/notifications", configure_notification_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(state.media.base_path()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configura le routes di autenticazione (sign-up, log-in, guest)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/sign-up", post(sign_up))
        .route("/log-in", post(log_in))
        .route("/guest", get(guest))
}

/// Configura le routes per le richieste di amicizia
fn configure_friendship_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/", post(create_friend_request))
        .route(
            "/{friendship_id}",
            patch(accept_friendship).delete(delete_friendship),
        )
        .route("/with/{user_id}", get(get_friendship_with))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per utenti, messaggi e gruppi (tutte sotto /users)
fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    let upload_limit = DefaultBodyLimit::max(state.media.max_size() + MULTIPART_OVERHEAD);

    Router::new()
        .route("/me", get(get_me))
        .route("/me/friends", get(get_friends))
        .route("/me/anonymous", get(get_anonymous))
        .route("/me/groups", get(list_groups).post(create_group))
        .route(
            "/me/groups/{group_id}",
            get(get_group).patch(rename_group).delete(delete_group),
        )
        .route(
            "/me/groups/{group_id}/notifications",
            post(invite_users)
                .patch(accept_invite)
                .delete(reject_invite),
        )
        .route(
            "/me/groups/{group_id}/members/{member_id}",
            axum::routing::delete(remove_member),
        )
        .route(
            "/me/groups/{group_id}/messages",
            get(get_group_messages)
                .post(send_group_message)
                .layer(upload_limit.clone()),
        )
        .route(
            "/{user_id}/messages",
            get(get_direct_messages)
                .post(send_direct_message)
                .layer(upload_limit),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per l'inbox delle notifiche
fn configure_notification_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use core::authentication_middleware;
    use services::*;

    Router::new()
        .route("/me", get(get_my_notifications))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
