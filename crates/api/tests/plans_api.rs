//! Integration tests for the admin role gate, plan catalogue, and subscriptions.

mod common;

use axum::http::StatusCode;
use common::{
    assign_role, body_json, create_account, delete_auth, get, get_auth, login, post_auth,
    post_json_auth, put_json_auth, TEST_PASSWORD,
};
use mentorly_db::repositories::SubscriptionRepo;
use serde_json::json;
use sqlx::PgPool;

/// Create an admin account and return its token.
async fn admin_token(pool: &PgPool, app: &axum::Router) -> String {
    let admin = create_account(pool, "admin@x.com").await;
    assign_role(pool, admin.id, "admin").await;
    login(app, "admin@x.com", TEST_PASSWORD).await
}

async fn create_plan(app: &axum::Router, token: &str, name: &str, price: f64) -> i64 {
    let body = json!({ "name": name, "price": price, "description": "Monthly mentoring" });
    let response = post_json_auth(app.clone(), "/plans", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Role gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn plans_require_authentication(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/plans").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_are_forbidden(pool: PgPool) {
    let mentor = create_account(&pool, "mentor@x.com").await;
    assign_role(&pool, mentor.id, "mentor").await;
    create_account(&pool, "norole@x.com").await;
    let app = common::build_test_app(pool);

    for email in ["mentor@x.com", "norole@x.com"] {
        let token = login(&app, email, TEST_PASSWORD).await;
        let response = get_auth(app.clone(), "/plans", &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{email}");
        assert_eq!(body_json(response).await["code"], "FORBIDDEN");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn role_gate_reads_the_current_role(pool: PgPool) {
    let account = create_account(&pool, "promoted@x.com").await;
    let app = common::build_test_app(pool.clone());
    let token = login(&app, "promoted@x.com", TEST_PASSWORD).await;

    let response = get_auth(app.clone(), "/plans", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assign_role(&pool, account.id, "admin").await;

    let response = get_auth(app, "/plans", &token).await;
    assert_eq!(response.status(), StatusCode::OK, "same token, new role");
}

// ---------------------------------------------------------------------------
// Plan CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_plans(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let id = create_plan(&app, &token, "Starter", 19.99).await;

    let response = get_auth(app.clone(), &format!("/plans/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let plan = body_json(response).await;
    assert_eq!(plan["data"]["name"], "Starter");
    assert_eq!(plan["data"]["is_active"], true);

    let body = json!({ "name": "Starter Plus", "price": 29.5, "is_active": false });
    let response = put_json_auth(app.clone(), &format!("/plans/{id}"), &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["price"], 29.5);
    assert_eq!(updated["data"]["is_active"], false);
    assert!(updated["data"]["description"].is_null());

    let response = get_auth(app.clone(), "/plans", &token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &format!("/plans/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &format!("/plans/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plan_validation_and_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = admin_token(&pool, &app).await;

    let body = json!({ "name": "Negative", "price": -1.0 });
    let response = post_json_auth(app.clone(), "/plans", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "", "price": 10.0 });
    let response = post_json_auth(app.clone(), "/plans", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    create_plan(&app, &token, "Pro", 49.0).await;
    let body = json!({ "name": "Pro", "price": 59.0 });
    let response = post_json_auth(app.clone(), "/plans", &token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        app.clone(),
        "/plans/999999",
        &token,
        json!({ "name": "Ghost", "price": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, "/plans/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn any_account_can_subscribe_to_an_active_plan(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;
    let plan_id = create_plan(&app, &admin, "Mentoring", 15.0).await;

    let member = create_account(&pool, "member@x.com").await;
    let token = login(&app, "member@x.com", TEST_PASSWORD).await;

    let response = post_auth(app.clone(), &format!("/auth/subscribe/{plan_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["plan_id"], plan_id);
    assert_eq!(json["data"]["account_id"], member.id);

    let subscriptions = SubscriptionRepo::list_for_account(&pool, member.id).await.unwrap();
    assert_eq!(subscriptions.len(), 1);
    assert!(subscriptions[0].expires_at > subscriptions[0].starts_at);

    // A plan with subscribers cannot be deleted.
    let response = delete_auth(app, &format!("/plans/{plan_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn subscribe_to_missing_or_inactive_plan_fails(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let admin = admin_token(&pool, &app).await;

    let response = post_auth(app.clone(), "/auth/subscribe/424242", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json!({ "name": "Retired", "price": 5.0, "is_active": false });
    let response = post_json_auth(app.clone(), "/plans", &admin, body).await;
    let plan_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_auth(app.clone(), &format!("/auth/subscribe/{plan_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::post_json(app, &format!("/auth/subscribe/{plan_id}"), json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
