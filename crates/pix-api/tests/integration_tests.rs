//! # Integration Tests for pix-api
//!
//! Drives the full router against the in-memory repository: health probes,
//! receiver registration and validation errors, listing with filters and
//! pagination, the DRAFT/VALID lifecycle, bulk deletion and the OpenAPI
//! document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pix_api::config::AppConfig;
use pix_api::state::AppState;

/// Helper: build the test app on in-memory storage.
fn test_app() -> axum::Router {
    pix_api::app(AppState::new())
}

/// Helper: build the test app with a custom page size.
fn test_app_with_page_size(page_size: u32) -> axum::Router {
    let config = AppConfig {
        page_size,
        ..AppConfig::default()
    };
    pix_api::app(AppState::with_config(config, None))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: send a request with an optional JSON body and parse the reply.
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let text = body_string(response).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, value)
}

fn receiver_body(name: &str) -> Value {
    json!({
        "name": name,
        "document": "12345678901",
        "email": "felipe@email.com",
        "pix_key_value": "felipe@email.com",
        "pix_key_type": "email",
    })
}

async fn create(app: &axum::Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/v1/receivers", Some(receiver_body(name))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["receiver_id"].as_str().unwrap().to_string()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe_without_database() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Registration -------------------------------------------------------------

#[tokio::test]
async fn test_create_receiver_returns_draft() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(receiver_body("Felipe"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["document"], "12345678901");
    assert_eq!(body["email"], "felipe@email.com");
    assert_eq!(body["pix_key"]["value"], "felipe@email.com");
    assert_eq!(body["pix_key"]["type"], "Email");
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_receiver_with_banking_fields() {
    let app = test_app();
    let mut req = receiver_body("Jane Doe");
    req["bank"] = json!("Nubank");
    req["office"] = json!("0001");
    req["account_number"] = json!("123456");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["bank"], "Nubank");
    assert_eq!(body["office"], "0001");
    assert_eq!(body["account_number"], "123456");
}

#[tokio::test]
async fn test_create_without_email_omits_it() {
    let app = test_app();
    let mut req = receiver_body("Jane Doe");
    req.as_object_mut().unwrap().remove("email");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("email").is_none());
}

#[tokio::test]
async fn test_create_invalid_document_reports_field() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["document"] = json!("123");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DOCUMENT");
    assert_eq!(body["error"]["causes"][0]["field"], "document");
}

#[tokio::test]
async fn test_create_mismatched_pix_key() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["pix_key_type"] = json!("phone");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PIX_KEY");
    assert_eq!(body["error"]["causes"][0]["field"], "pix_key");
}

#[tokio::test]
async fn test_create_unknown_key_type() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["pix_key_type"] = json!("iban");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_KEY_TYPE");
    assert_eq!(body["error"]["causes"][0]["field"], "pix_key_type");
}

#[tokio::test]
async fn test_create_empty_document_is_invalid_document() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["document"] = json!("");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DOCUMENT");
    assert_eq!(body["error"]["causes"][0]["field"], "document");
}

#[tokio::test]
async fn test_create_empty_pix_key_value_is_invalid_pix_key() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["pix_key_value"] = json!("");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PIX_KEY");
    assert_eq!(body["error"]["causes"][0]["field"], "pix_key");
    assert_eq!(
        body["error"]["causes"][0]["message"],
        "invalid pix key: key value must not be empty"
    );
}

#[tokio::test]
async fn test_create_empty_pix_key_type_is_invalid_key_type() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["pix_key_type"] = json!("");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_KEY_TYPE");
    assert_eq!(body["error"]["causes"][0]["field"], "pix_key_type");
}

#[tokio::test]
async fn test_create_accepts_blank_name() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req["name"] = json!("");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "");
}

#[tokio::test]
async fn test_create_missing_field_is_bad_request() {
    let app = test_app();
    let mut req = receiver_body("Felipe");
    req.as_object_mut().unwrap().remove("document");
    let (status, body) = send(&app, "POST", "/v1/receivers", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_create_malformed_json_is_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/receivers")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Lookup -------------------------------------------------------------------

#[tokio::test]
async fn test_get_receiver_round_trips() {
    let app = test_app();
    let id = create(&app, "Felipe").await;
    let (status, body) = send(&app, "GET", &format!("/v1/receivers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["receiver_id"], id.as_str());
    assert_eq!(body["name"], "Felipe");
}

#[tokio::test]
async fn test_get_unknown_receiver_is_404() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "GET",
        "/v1/receivers/00000000-0000-4000-8000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_with_malformed_id_is_400() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/v1/receivers/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Listing ------------------------------------------------------------------

#[tokio::test]
async fn test_list_paginates() {
    let app = test_app_with_page_size(2);
    for name in ["John Doe", "Jane Doe", "John Smith"] {
        create(&app, name).await;
    }

    let (status, page1) = send(&app, "GET", "/v1/receivers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page1["current_page"], 1);
    assert_eq!(page1["receivers"].as_array().unwrap().len(), 2);

    let (_, page2) = send(&app, "GET", "/v1/receivers?page=2", None).await;
    assert_eq!(page2["current_page"], 2);
    assert_eq!(page2["receivers"].as_array().unwrap().len(), 1);

    let (_, page3) = send(&app, "GET", "/v1/receivers?page=3", None).await;
    assert!(page3["receivers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_filters_by_name_and_status() {
    let app = test_app();
    let jane = create(&app, "Jane Doe").await;
    create(&app, "John Doe").await;
    create(&app, "Jane Smith").await;

    let (_, by_name) = send(&app, "GET", "/v1/receivers?name=jane", None).await;
    assert_eq!(by_name["receivers"].as_array().unwrap().len(), 2);

    send(&app, "POST", &format!("/v1/receivers/{jane}/validate"), None).await;
    let (_, valid) = send(&app, "GET", "/v1/receivers?status=VALID", None).await;
    let valid = valid["receivers"].as_array().unwrap();
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0]["receiver_id"], jane.as_str());

    let (_, drafts) = send(&app, "GET", "/v1/receivers?status=draft&name=doe", None).await;
    assert_eq!(drafts["receivers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_filters_by_pix_key() {
    let app = test_app();
    create(&app, "Felipe").await;
    let mut cpf = receiver_body("Jane Doe");
    cpf["pix_key_value"] = json!("12345678901");
    cpf["pix_key_type"] = json!("CPF");
    send(&app, "POST", "/v1/receivers", Some(cpf)).await;

    let (_, by_type) = send(&app, "GET", "/v1/receivers?pix_key_type=cpf", None).await;
    let by_type = by_type["receivers"].as_array().unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0]["name"], "Jane Doe");

    let (_, by_value) = send(
        &app,
        "GET",
        "/v1/receivers?pix_key_value=felipe@email.com",
        None,
    )
    .await;
    assert_eq!(by_value["receivers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_rejects_unknown_filters() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/v1/receivers?status=ARCHIVED", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app, "GET", "/v1/receivers?pix_key_type=iban", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_KEY_TYPE");

    let (status, _) = send(&app, "GET", "/v1/receivers?page=first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// -- Lifecycle ----------------------------------------------------------------

#[tokio::test]
async fn test_draft_update_then_validate_locks_fields() {
    let app = test_app();
    let id = create(&app, "Felipe").await;
    let uri = format!("/v1/receivers/{id}");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"name": "Felipe Magrassi", "pix_key_value": "11222333000181", "pix_key_type": "cnpj"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Felipe Magrassi");
    assert_eq!(body["pix_key"]["type"], "Cnpj");

    let (status, body) = send(&app, "POST", &format!("{uri}/validate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VALID");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"name": "Someone Else"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ALREADY_VALID");

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["name"], "Felipe Magrassi");
}

#[tokio::test]
async fn test_failed_draft_update_leaves_receiver_unchanged() {
    let app = test_app();
    let id = create(&app, "Felipe").await;
    let uri = format!("/v1/receivers/{id}");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"name": "Changed", "document": "not-a-document"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["name"], "Felipe");
    assert_eq!(body["document"], "12345678901");
}

#[tokio::test]
async fn test_email_can_change_after_validation() {
    let app = test_app();
    let id = create(&app, "Felipe").await;
    send(&app, "POST", &format!("/v1/receivers/{id}/validate"), None).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/v1/receivers/{id}/email"),
        Some(json!({"email": "new@email.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@email.com");
    assert_eq!(body["status"], "VALID");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/v1/receivers/{id}/email"),
        Some(json!({"email": "broken"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_EMAIL");
}

#[tokio::test]
async fn test_validate_unknown_receiver_is_404() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/v1/receivers/00000000-0000-4000-8000-000000000000/validate",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Deletion -----------------------------------------------------------------

#[tokio::test]
async fn test_delete_receivers() {
    let app = test_app();
    let a = create(&app, "John Doe").await;
    let b = create(&app, "Jane Doe").await;
    let keep = create(&app, "John Smith").await;

    let (status, _) = send(&app, "DELETE", "/v1/receivers", Some(json!({"ids": [a, b]}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/v1/receivers/{a}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", &format!("/v1/receivers/{keep}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "DELETE", "/v1/receivers", Some(json!({"ids": [a]}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_requires_ids() {
    let app = test_app();
    let (status, body) = send(&app, "DELETE", "/v1/receivers", Some(json!({"ids": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/receivers/{id}/validate"].is_object());
    assert!(body["components"]["schemas"]["ReceiverOutput"].is_object());
}
