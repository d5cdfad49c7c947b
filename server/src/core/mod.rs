//! Core Module - componenti infrastrutturali dell'applicazione
//!
//! - Autenticazione e JWT
//! - Configurazione
//! - Gestione errori
//! - Estrattori
//! - Stato applicazione

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;

// Re-exports per facilitare l'import
pub use auth::{Claims, authentication_middleware, decode_jwt, encode_jwt};
pub use config::Config;
pub use error::AppError;
pub use extract::ValidJson;
pub use state::AppState;
