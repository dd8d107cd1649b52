#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use mentorly_api::auth::jwt::{JwtConfig, TokenCodec};
use mentorly_api::auth::oauth::{
    OAuthConfig, OAuthError, OAuthExchange, OAuthProfile, Provider, ProviderCredentials,
};
use mentorly_api::auth::password::hash_password;
use mentorly_api::config::{ServerConfig, SessionPolicy};
use mentorly_api::router::build_app_router;
use mentorly_api::state::AppState;
use mentorly_db::models::account::{Account, CreateAccount};
use mentorly_db::repositories::{AccountRepo, RoleRepo};
use mentorly_events::{EmailError, EmailMessage, EmailQueue, MailTransport};

pub const TEST_SECRET: &str = "integration-test-secret-long-enough";
pub const TEST_PASSWORD: &str = "secret1";
pub const FRONTEND_URL: &str = "http://localhost:5173";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and GitHub OAuth enabled.
pub fn test_config(policy: SessionPolicy) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![FRONTEND_URL.to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        session_policy: policy,
        frontend_url: FRONTEND_URL.to_string(),
        oauth: OAuthConfig {
            github: Some(ProviderCredentials {
                client_id: "test-client".to_string(),
                client_secret: "test-secret".to_string(),
                redirect_url: "http://localhost:3000/auth/github/callback".to_string(),
            }),
            ..Default::default()
        },
        oauth_timeout_secs: 5,
        email_queue_capacity: 16,
    }
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
    })
    .expect("test codec should build")
}

/// Options for [`build_test_app_with`].
pub struct TestApp {
    pub policy: SessionPolicy,
    pub oauth: Arc<dyn OAuthExchange>,
    pub mailer: Option<EmailQueue>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self {
            policy: SessionPolicy::Enforce,
            oauth: Arc::new(StubOAuth::new()),
            mailer: None,
        }
    }
}

/// Build the full application router with the default test options.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestApp::default())
}

/// Build the full application router through the same builder `main.rs` uses.
pub fn build_test_app_with(pool: PgPool, options: TestApp) -> Router {
    let config = test_config(options.policy);
    let state = AppState {
        pool,
        tokens: Arc::new(test_codec()),
        oauth: options.oauth,
        mailer: options.mailer,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// OAuth stub
// ---------------------------------------------------------------------------

/// Returns a canned profile per authorization code.
///
/// The code doubles as the email's local part (`code@oauth.test`); the code
/// `fail` simulates a provider outage.
pub struct StubOAuth {
    pub calls: Mutex<Vec<(Provider, String)>>,
}

impl StubOAuth {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OAuthExchange for StubOAuth {
    async fn exchange(&self, provider: Provider, code: &str) -> Result<OAuthProfile, OAuthError> {
        self.calls
            .lock()
            .unwrap()
            .push((provider, code.to_string()));

        if code == "fail" {
            return Err(OAuthError::Exchange("provider unavailable".into()));
        }

        Ok(OAuthProfile {
            provider,
            subject: format!("{provider}-{code}"),
            email: format!("{code}@oauth.test"),
            name: format!("User {code}"),
            avatar_url: Some(format!("https://avatars.test/{code}.png")),
        })
    }
}

// ---------------------------------------------------------------------------
// Mail recorder
// ---------------------------------------------------------------------------

/// A transport that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Data helpers
// ---------------------------------------------------------------------------

/// Insert a password account directly and return it.
pub async fn create_account(pool: &PgPool, email: &str) -> Account {
    let input = CreateAccount {
        email: email.to_string(),
        name: "Test".to_string(),
        surname: Some("User".to_string()),
        password_hash: Some(hash_password(TEST_PASSWORD).expect("hashing should succeed")),
        ..Default::default()
    };
    AccountRepo::create(pool, &input)
        .await
        .expect("account creation should succeed")
}

/// Assign a seeded role by name.
pub async fn assign_role(pool: &PgPool, account_id: i64, role: &str) {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .expect("role should be seeded");
    assert!(AccountRepo::set_role(pool, account_id, role.id).await.unwrap());
}

pub async fn count_accounts(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Log in through the API and return the issued token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app.clone(), "/auth/login", body).await;
    assert_eq!(response.status(), 200, "login should succeed for {email}");
    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("login response must contain a token")
        .to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, format!("auth_token={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Drive a provider callback the way a browser returning from the provider
/// would: a valid `state` query parameter plus the matching state cookie.
/// `query` is appended after `state`, e.g. `code=abc`.
pub async fn oauth_callback(app: Router, method: Method, provider: &str, query: &str) -> Response<Body> {
    let state = "test-state";
    let uri = if query.is_empty() {
        format!("/auth/{provider}/callback?state={state}")
    } else {
        format!("/auth/{provider}/callback?state={state}&{query}")
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(COOKIE, format!("oauth_state={provider}.{state}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// The `Set-Cookie` header value for cookie `name`, if any.
pub fn set_cookie_named(response: &Response<Body>, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&prefix))
        .map(str::to_string)
}

/// The first `Set-Cookie` header value, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
