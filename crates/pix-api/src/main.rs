//! # pix-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Storage is Postgres when `DATABASE_URL` is
//! set, in memory otherwise.

use pix_api::config::{init_tracing, AppConfig};
use pix_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    init_tracing(config.log_format);

    let db_pool = pix_api::db::init_pool(&config).await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let port = config.port;
    let state = AppState::with_config(config, db_pool);
    let app = pix_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("PIX API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
