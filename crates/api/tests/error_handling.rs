//! Tests for `AppError` → HTTP response mapping.
//!
//! Most cases call `IntoResponse` directly; the last ones go through the
//! router to check extractor rejections keep the same shape.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use mentorly_api::auth::gateway::AuthError;
use mentorly_api::auth::jwt::TokenError;
use mentorly_api::auth::oauth::{OAuthError, Provider};
use mentorly_api::error::AppError;
use mentorly_core::error::CoreError;
use mentorly_db::repositories::SessionError;
use sqlx::PgPool;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "plan",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "plan with id 42 not found");
}

#[tokio::test]
async fn email_taken_returns_409() {
    let (status, json) = error_to_response(AuthError::EmailTaken.into()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn credential_and_token_failures_share_one_message() {
    let (status, json) = error_to_response(AuthError::InvalidCredentials.into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Invalid email or password");

    for err in [TokenError::Malformed, TokenError::BadSignature, TokenError::Expired] {
        let (status, json) = error_to_response(err.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["error"], "Invalid or expired token");
    }

    let (status, json) = error_to_response(SessionError::NotFound.into()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "Session is not active");
}

#[tokio::test]
async fn forbidden_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Role 'admin' required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn upstream_failures_hide_provider_details() {
    let err: AppError = OAuthError::Exchange("token endpoint said: client_secret=abc".into()).into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("client_secret"));
}

#[tokio::test]
async fn unconfigured_provider_is_a_bad_request() {
    let (status, json) = error_to_response(OAuthError::NotConfigured(Provider::Google).into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("jwt secret leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Through the router
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_is_a_validation_error(pool: PgPool) {
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Method, Request};

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_field_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "name": "Ana",
        "email": "ana@x.com",
        "password": "secret1",
    });

    let response = common::post_json(app, "/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("confirm_password"));
    assert_eq!(common::count_accounts(&pool, "ana@x.com").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_field_type_on_profile_update_is_a_validation_error(pool: PgPool) {
    common::create_account(&pool, "typed@x.com").await;
    let app = common::build_test_app(pool);
    let token = common::login(&app, "typed@x.com", common::TEST_PASSWORD).await;

    let body = serde_json::json!({ "name": 42 });
    let response = common::put_json_auth(app, "/user/profile", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn body_without_json_content_type_is_a_validation_error(pool: PgPool) {
    use axum::body::Body;
    use axum::http::{Method, Request};

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .body(Body::from("email=a@x.com"))
        .unwrap();

    let response = common::send(app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn handler_errors_carry_error_and_code(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/user/profile").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing authentication token");
}
