mod config;
mod db;
mod drawing;
mod error;
mod form;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use axum_extra::extract::cookie::Key;

use crate::config::{AppConfig, ConfigError};
use crate::services::memory_store::MemoryShapeStore;
use crate::services::pg_store::PgShapeStore;
use crate::services::store::ShapeStore;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database init failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let config = AppConfig::from_env()?;

    let store: Arc<dyn ShapeStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres shape store ready");
            Arc::new(PgShapeStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; shapes are kept in memory and lost on restart");
            Arc::new(MemoryShapeStore::new())
        }
    };

    let cookie_key = match config.session_secret.as_deref() {
        Some(secret) => services::session::derive_key(secret),
        None => {
            tracing::warn!("SESSION_SECRET not set; sessions will not survive a restart");
            Key::generate()
        }
    };

    let state = state::AppState::new(store, cookie_key, config.cookie_secure);
    let app = routes::app(state);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "single-div-painter listening");
    axum::serve(listener, app).await?;
    Ok(())
}
