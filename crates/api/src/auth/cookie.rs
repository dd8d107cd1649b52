//! Browser cookies: `auth_token` and the short-lived `oauth_state`.
//!
//! Browser clients receive the bearer token as an HttpOnly cookie so the
//! frontend never reads it from script; the request extractor accepts it as
//! a fallback when no `Authorization` header is present.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use mentorly_core::session_id::SESSION_LIFETIME_DAYS;

/// Cookie name carrying the bearer token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Cookie name carrying the provider-bound OAuth `state`.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// How long a browser has to complete the provider round trip.
pub const OAUTH_STATE_TTL_MINUTES: i64 = 10;

/// Build the cookie that carries `token` for the session lifetime.
pub fn auth_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(SESSION_LIFETIME_DAYS))
        .build()
}

/// Overwrite the auth cookie with an empty, already-expired one.
///
/// Always emitted, even when the request authenticated with a header and
/// carried no cookie.
pub fn clear_auth_cookie(jar: CookieJar) -> CookieJar {
    jar.add(
        Cookie::build((AUTH_COOKIE, ""))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .build(),
    )
}

/// Build the state cookie for one authorization round trip. `value` is the
/// provider-bound state from `oauth::state_binding`.
pub fn oauth_state_cookie(value: String) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, value))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(OAUTH_STATE_TTL_MINUTES))
        .build()
}

/// Expire the state cookie so a state value is accepted at most once.
pub fn clear_oauth_state_cookie(jar: CookieJar) -> CookieJar {
    jar.add(
        Cookie::build((OAUTH_STATE_COOKIE, ""))
            .http_only(true)
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .build(),
    )
}
