//! Handlers for ending sessions.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::auth::cookie::clear_auth_cookie;
use crate::auth::gateway;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, BearerToken};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutAllResponse {
    pub revoked: u64,
}

/// POST /user/logout
///
/// Revoke the session of the presented token and clear the cookie. A token
/// that is already logged out still succeeds; a token that does not verify
/// is a 400.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    BearerToken(token): BearerToken,
) -> AppResult<(CookieJar, Json<DataResponse<LogoutResponse>>)> {
    let claims = state
        .tokens
        .verify(&token)
        .map_err(|e| AppError::BadRequest(format!("Invalid token: {e}")))?;

    gateway::logout(&state.pool, &token).await?;
    tracing::info!(account_id = claims.sub, operation = "logout", "Session revoked");

    Ok((
        clear_auth_cookie(jar),
        Json(DataResponse {
            data: LogoutResponse {
                message: "Logged out",
            },
        }),
    ))
}

/// POST /user/logout-all
///
/// Revoke every session of the authenticated account.
pub async fn logout_all(
    State(state): State<AppState>,
    jar: CookieJar,
    user: AuthUser,
) -> AppResult<(CookieJar, Json<DataResponse<LogoutAllResponse>>)> {
    let revoked = gateway::logout_all(&state.pool, user.account_id).await?;

    Ok((
        clear_auth_cookie(jar),
        Json(DataResponse {
            data: LogoutAllResponse { revoked },
        }),
    ))
}
