//! # OpenAPI Specification Assembly
//!
//! Collects the utoipa-documented receiver routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the whole API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PIX Receiver API",
        version = "0.1.0",
        description = "Registration and lifecycle of PIX payment receivers.\n\nReceivers start as DRAFT and may be edited freely; once promoted to VALID only the email may change.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::receivers::create_receiver,
        crate::routes::receivers::find_receivers,
        crate::routes::receivers::delete_receivers,
        crate::routes::receivers::get_receiver,
        crate::routes::receivers::update_receiver,
        crate::routes::receivers::update_email,
        crate::routes::receivers::validate_receiver,
    ),
    components(
        schemas(
            crate::service::CreateReceiverInput,
            crate::service::UpdateDraftInput,
            crate::service::ReceiverOutput,
            crate::service::PixKeyOutput,
            crate::service::FindReceiversOutput,
            crate::routes::receivers::UpdateEmailRequest,
            crate::routes::receivers::DeleteReceiversRequest,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            crate::error::ErrorCause,
        )
    ),
    tags(
        (name = "receivers", description = "PIX receivers: DRAFT edits, promotion to VALID, listing and deletion"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
