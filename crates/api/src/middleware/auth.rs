//! Token-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use mentorly_core::types::DbId;
use mentorly_db::repositories::SessionRepo;

use crate::auth::cookie::AUTH_COOKIE;
use crate::config::SessionPolicy;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated account extracted from the request.
///
/// The token is taken from `Authorization: Bearer <token>` or, failing that,
/// the `auth_token` cookie. Under [`SessionPolicy::Enforce`] the token must
/// also have an active session.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(account_id = user.account_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account's internal database id (from `claims.sub`).
    pub account_id: DbId,
    pub email: String,
    /// The raw token presented with this request.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("Missing authentication token"))?;

        let claims = state.tokens.verify(&token)?;

        if state.config.session_policy == SessionPolicy::Enforce {
            let session = SessionRepo::find_by_token(&state.pool, &token).await?;
            if session.account_id != claims.sub {
                return Err(AppError::unauthorized("Session does not match token"));
            }
        }

        Ok(AuthUser {
            account_id: claims.sub,
            email: claims.email,
            token,
        })
    }
}

/// The raw bearer token, not yet verified. Rejects with 400 when absent.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_token(&parts.headers)
            .map(BearerToken)
            .ok_or_else(|| AppError::BadRequest("Missing bearer token".into()))
    }
}

/// Find the request's token: a `Bearer` authorization header (scheme matched
/// case-insensitively) first, then the `auth_token` cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(headers)
            .get(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let map = headers(&[(AUTHORIZATION, "bEaReR abc.def.ghi")]);
        assert_eq!(extract_token(&map).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn header_wins_over_cookie() {
        let map = headers(&[
            (AUTHORIZATION, "Bearer from-header"),
            (COOKIE, "auth_token=from-cookie"),
        ]);
        assert_eq!(extract_token(&map).as_deref(), Some("from-header"));
    }

    #[test]
    fn cookie_is_used_when_header_missing_or_not_bearer() {
        let map = headers(&[(COOKIE, "theme=dark; auth_token=from-cookie")]);
        assert_eq!(extract_token(&map).as_deref(), Some("from-cookie"));

        let map = headers(&[
            (AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (COOKIE, "auth_token=from-cookie"),
        ]);
        assert_eq!(extract_token(&map).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn nothing_usable_yields_none() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        assert_eq!(extract_token(&headers(&[(AUTHORIZATION, "Bearer ")])), None);
        assert_eq!(extract_token(&headers(&[(COOKIE, "auth_token=")])), None);
    }
}
