//! socialhub-server - avvio del processo

use socialhub_server::config::Config;
use socialhub_server::media::MediaStore;
use socialhub_server::{AppState, create_router};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging (rispetta RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,socialhub_server=debug")),
        )
        .init();

    info!("Starting socialhub-server v{}", env!("CARGO_PKG_VERSION"));

    // 2. Configurazione da .env / variabili d'ambiente
    let config = Config::from_env()?;
    config.print_info();

    // 3. Pool di connessioni + migration
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied");

    // 4. Stato condiviso e router
    let media = MediaStore::new(config.upload_dir.clone(), config.max_upload_bytes);
    let state = Arc::new(AppState::new(pool, config.jwt_secret.clone()).with_media(media));
    let app = create_router(state);

    // 5. Avvio del server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
