#![allow(dead_code)]

use axum_test::TestServer;
use socialhub_server::core::AppState;
use socialhub_server::media::MediaStore;
use sqlx::MySqlPool;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

pub const ALICE: &str = "11111111-1111-4111-8111-111111111111";
pub const BOB: &str = "22222222-2222-4222-8222-222222222222";
pub const CHARLIE: &str = "33333333-3333-4333-8333-333333333333";
pub const DAVE: &str = "44444444-4444-4444-8444-444444444444";

pub const ALICE_BOB: &str = "aaaaaaaa-0000-4000-8000-000000000001";
pub const CHARLIE_ALICE: &str = "aaaaaaaa-0000-4000-8000-000000000002";
pub const BOOK_CLUB: &str = "cccccccc-0000-4000-8000-000000000001";

/// Crea un AppState per i test, con le immagini in una directory temporanea
pub fn create_test_state(pool: MySqlPool) -> Arc<AppState> {
    let upload_dir = std::env::temp_dir().join(format!("socialhub-test-{}", uuid::Uuid::new_v4()));
    let media = MediaStore::new(upload_dir, 1024 * 1024);
    Arc::new(AppState::new(pool, JWT_SECRET.to_string()).with_media(media))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = socialhub_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Server pronto all'uso sul pool del test
pub fn server(pool: MySqlPool) -> TestServer {
    create_test_server(create_test_state(pool))
}

/// Genera un JWT token valido 24 ore per l'utente
pub fn create_test_jwt(user_id: &str) -> String {
    socialhub_server::auth::encode_jwt(user_id, chrono::Duration::hours(24), JWT_SECRET)
        .expect("Failed to create JWT token")
}

/// Header Authorization per l'utente
pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", create_test_jwt(user_id))
}
