pub mod auth;
pub mod health;
pub mod oauth;
pub mod plans;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
/// /auth/{provider}/callback         OAuth callback, GET or POST (public)
/// /auth/subscribe/{plan_id}         subscribe to a plan (requires auth)
///
/// /oauth/{provider}/url             provider authorize URL (public)
///
/// /user/logout                      revoke the presented token's session
/// /user/logout-all                  revoke every session (requires auth)
/// /user/profile                     get, update (requires auth)
/// /user/select-role                 pick mentor or entrepreneur (requires auth)
///
/// /plans                            list, create (admin only)
/// /plans/{id}                       get, update, delete (admin only)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/oauth", oauth::router())
        .nest("/user", user::router())
        .nest("/plans", plans::router())
}
