//! Handlers for third-party login.

use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{
    auth_cookie, clear_oauth_state_cookie, oauth_state_cookie, OAUTH_STATE_COOKIE,
};
use crate::auth::identity;
use crate::auth::oauth::{
    authorize_url, check_state, new_state, state_binding, OAuthError, Provider,
};
use crate::error::AppResult;
use crate::handlers::auth::issue_session;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AuthUrlResponse {
    pub provider: &'static str,
    pub url: String,
}

/// Query parameters a provider appends when redirecting back.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /oauth/{provider}/url
///
/// Also sets the `oauth_state` cookie the callback checks the returned
/// `state` against.
pub async fn auth_url(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<DataResponse<AuthUrlResponse>>)> {
    let provider: Provider = provider.parse()?;
    let creds = state
        .config
        .oauth
        .credentials(provider)
        .ok_or(OAuthError::NotConfigured(provider))?;

    let oauth_state = new_state();
    let url = authorize_url(provider, creds, &oauth_state)?;
    let jar = jar.add(oauth_state_cookie(state_binding(provider, &oauth_state)));

    Ok((
        jar,
        Json(DataResponse {
            data: AuthUrlResponse {
                provider: provider.as_str(),
                url: url.to_string(),
            },
        }),
    ))
}

/// GET|POST /auth/{provider}/callback
///
/// Check `state` against the browser's state cookie, exchange the code,
/// resolve the account by email, sign it in, and redirect the browser to
/// `{FRONTEND_URL}/role` with the `auth_token` cookie set.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let provider: Provider = provider.parse()?;

    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or_default();
        tracing::info!(provider = %provider, %error, "Provider denied authorization");
        return Err(OAuthError::Denied(format!("{error} {detail}").trim().to_string()).into());
    }

    check_state(
        provider,
        jar.get(OAUTH_STATE_COOKIE).map(|c| c.value()),
        params.state.as_deref(),
    )?;

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(OAuthError::MissingCode)?;

    let profile = state.oauth.exchange(provider, &code).await?;
    let account = identity::find_or_create_by_email(&state.pool, &profile).await?;
    let token = issue_session(&state, account.id, &account.email).await?;

    tracing::info!(account_id = account.id, provider = %provider, operation = "oauth_login", "Account signed in");

    let location = format!("{}/role", state.config.frontend_url);
    let jar = clear_oauth_state_cookie(jar).add(auth_cookie(token));
    Ok((StatusCode::FOUND, jar, [(LOCATION, location)]))
}
