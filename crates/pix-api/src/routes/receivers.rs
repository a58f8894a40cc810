//! # Receiver API
//!
//! Registration, lookup, listing, draft edits, email changes, promotion and
//! bulk deletion of PIX receivers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use pix_core::ReceiverId;

use crate::error::AppError;
use crate::extractors::{
    extract_json, extract_query, extract_receiver_id, extract_validated_json, Validate,
};
use crate::service::{
    CreateReceiverInput, FindReceiversInput, FindReceiversOutput, ReceiverOutput, UpdateDraftInput,
};
use crate::state::AppState;

/// Request to change a receiver's email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEmailRequest {
    pub email: String,
}

/// Request to delete receivers in bulk.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteReceiversRequest {
    pub ids: Vec<Uuid>,
}

impl Validate for DeleteReceiversRequest {
    fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("ids must contain at least one receiver id".to_string());
        }
        Ok(())
    }
}

/// Build the receivers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/receivers",
            get(find_receivers)
                .post(create_receiver)
                .delete(delete_receivers),
        )
        .route("/v1/receivers/{id}", get(get_receiver).put(update_receiver))
        .route("/v1/receivers/{id}/email", patch(update_email))
        .route("/v1/receivers/{id}/validate", post(validate_receiver))
}

/// POST /v1/receivers: Register a DRAFT receiver.
#[utoipa::path(
    post,
    path = "/v1/receivers",
    request_body = CreateReceiverInput,
    responses(
        (status = 201, description = "Receiver created", body = ReceiverOutput),
        (status = 400, description = "Invalid input", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn create_receiver(
    State(state): State<AppState>,
    body: Result<Json<CreateReceiverInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ReceiverOutput>), AppError> {
    let input = extract_json(body)?;
    let receiver = state.receivers.create(input).await?;
    Ok((StatusCode::CREATED, Json(receiver)))
}

/// GET /v1/receivers: List receivers, newest first.
#[utoipa::path(
    get,
    path = "/v1/receivers",
    params(FindReceiversInput),
    responses(
        (status = 200, description = "One page of receivers", body = FindReceiversOutput),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn find_receivers(
    State(state): State<AppState>,
    query: Result<Query<FindReceiversInput>, QueryRejection>,
) -> Result<Json<FindReceiversOutput>, AppError> {
    let input = extract_query(query)?;
    Ok(Json(state.receivers.find_many(input).await?))
}

/// DELETE /v1/receivers: Delete receivers by id.
#[utoipa::path(
    delete,
    path = "/v1/receivers",
    request_body = DeleteReceiversRequest,
    responses(
        (status = 204, description = "Receivers deleted"),
        (status = 400, description = "Empty id list", body = crate::error::ErrorBody),
        (status = 404, description = "None of the receivers exist", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn delete_receivers(
    State(state): State<AppState>,
    body: Result<Json<DeleteReceiversRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let req = extract_validated_json(body)?;
    let ids: Vec<ReceiverId> = req.ids.into_iter().map(ReceiverId::from_uuid).collect();
    state.receivers.delete_many(&ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/receivers/{id}: Get a receiver.
#[utoipa::path(
    get,
    path = "/v1/receivers/{id}",
    params(("id" = Uuid, Path, description = "Receiver ID")),
    responses(
        (status = 200, description = "Receiver found", body = ReceiverOutput),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn get_receiver(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ReceiverOutput>, AppError> {
    let id = extract_receiver_id(id)?;
    Ok(Json(state.receivers.find_by_id(id).await?))
}

/// PUT /v1/receivers/{id}: Edit a DRAFT receiver.
#[utoipa::path(
    put,
    path = "/v1/receivers/{id}",
    params(("id" = Uuid, Path, description = "Receiver ID")),
    request_body = UpdateDraftInput,
    responses(
        (status = 200, description = "Receiver updated", body = ReceiverOutput),
        (status = 400, description = "Invalid input or receiver already VALID", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn update_receiver(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateDraftInput>, JsonRejection>,
) -> Result<Json<ReceiverOutput>, AppError> {
    let id = extract_receiver_id(id)?;
    let input = extract_json(body)?;
    Ok(Json(state.receivers.update_draft(id, input).await?))
}

/// PATCH /v1/receivers/{id}/email: Change the email in any state.
#[utoipa::path(
    patch,
    path = "/v1/receivers/{id}/email",
    params(("id" = Uuid, Path, description = "Receiver ID")),
    request_body = UpdateEmailRequest,
    responses(
        (status = 200, description = "Email updated", body = ReceiverOutput),
        (status = 400, description = "Invalid email", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn update_email(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> Result<Json<ReceiverOutput>, AppError> {
    let id = extract_receiver_id(id)?;
    let req = extract_json(body)?;
    Ok(Json(state.receivers.update_email(id, &req.email).await?))
}

/// POST /v1/receivers/{id}/validate: Promote a receiver to VALID.
#[utoipa::path(
    post,
    path = "/v1/receivers/{id}/validate",
    params(("id" = Uuid, Path, description = "Receiver ID")),
    responses(
        (status = 200, description = "Receiver is VALID", body = ReceiverOutput),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "receivers"
)]
async fn validate_receiver(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ReceiverOutput>, AppError> {
    let id = extract_receiver_id(id)?;
    Ok(Json(state.receivers.promote(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_request_needs_ids() {
        let req = DeleteReceiversRequest { ids: vec![] };
        assert!(req.validate().is_err());
        let req = DeleteReceiversRequest {
            ids: vec![Uuid::new_v4()],
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn router_builds() {
        let _router = router();
    }
}
