//! # pix-api: Axum API Service for PIX Receivers
//!
//! HTTP surface over the receiver aggregate in `pix-state`.
//!
//! ## API Surface
//!
//! | Method   | Path                          | Operation |
//! |----------|-------------------------------|-----------|
//! | `POST`   | `/v1/receivers`               | Register a DRAFT receiver |
//! | `GET`    | `/v1/receivers`               | List receivers, filtered and paginated |
//! | `DELETE` | `/v1/receivers`               | Delete receivers by id |
//! | `GET`    | `/v1/receivers/{id}`          | Get one receiver |
//! | `PUT`    | `/v1/receivers/{id}`          | Edit a DRAFT receiver |
//! | `PATCH`  | `/v1/receivers/{id}/email`    | Change the email (any state) |
//! | `POST`   | `/v1/receivers/{id}/validate` | Promote to VALID |
//!
//! Health probes live at `/health/liveness` and `/health/readiness`; the
//! OpenAPI document is served at `/openapi.json`.
//!
//! ## Layers
//!
//! ```text
//! routes → ReceiverService → dyn ReceiverRepository → { in-memory Store | Postgres }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::receivers::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(api)
        .with_state(state)
}

/// Liveness probe. The process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. Returns 200 "ready", or 503 when the configured
/// database does not answer.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }
    (StatusCode::OK, "ready").into_response()
}
