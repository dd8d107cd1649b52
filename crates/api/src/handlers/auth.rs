//! Handlers for password registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use mentorly_core::roles::RoleAssignment;
use mentorly_core::types::DbId;
use mentorly_db::repositories::SessionRepo;
use mentorly_events::EmailMessage;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::auth_cookie;
use crate::auth::gateway::{self, AuthenticatedAccount, NewRegistration};
use crate::auth::password::check_new_password;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub surname: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful authentication payload returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account: AccountSummary,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: RoleAssignment,
}

impl From<AuthenticatedAccount> for AccountSummary {
    fn from(account: AuthenticatedAccount) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create a password account, then sign it in. Returns 201 with the token
/// in the body and the `auth_token` cookie.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<DataResponse<AuthResponse>>)> {
    input.validate()?;
    check_new_password(&input.password).map_err(gateway::AuthError::from)?;

    let registration = NewRegistration {
        email: input.email,
        name: input.name,
        surname: input.surname,
        password: input.password,
    };
    let account_id = gateway::register(&state.pool, &registration).await?;

    let token = issue_session(&state, account_id, &registration.email).await?;

    state.send_email(EmailMessage::welcome(&registration.email, &registration.name));

    let body = AuthResponse {
        token: token.clone(),
        account: AccountSummary {
            id: account_id,
            email: registration.email,
            name: registration.name,
            role: RoleAssignment::Unassigned,
        },
    };

    Ok((
        StatusCode::CREATED,
        jar.add(auth_cookie(token)),
        Json(DataResponse { data: body }),
    ))
}

/// POST /auth/login
///
/// Authenticate with email + password. Returns the token in the body and the
/// `auth_token` cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<DataResponse<AuthResponse>>)> {
    input.validate()?;

    let account = gateway::login(&state.pool, &input.email, &input.password).await?;
    let token = issue_session(&state, account.id, &account.email).await?;

    tracing::info!(account_id = account.id, operation = "login", "Account signed in");

    let body = AuthResponse {
        token: token.clone(),
        account: account.into(),
    };
    Ok((jar.add(auth_cookie(token)), Json(DataResponse { data: body })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a token and record its session.
///
/// Session bookkeeping is best effort: a storage failure is logged and the
/// sign-in still succeeds.
pub(crate) async fn issue_session(
    state: &AppState,
    account_id: DbId,
    email: &str,
) -> AppResult<String> {
    let token = state.tokens.issue(account_id, email)?;

    if let Err(e) = SessionRepo::create(&state.pool, account_id, &token).await {
        tracing::warn!(error = %e, account_id, "Failed to record session, continuing without it");
    }

    Ok(token)
}
