//! Route definitions for the signed-in account (`/user`).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{profile, session};
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// POST /logout        -> logout
/// POST /logout-all    -> logout_all
/// GET  /profile       -> get_profile
/// PUT  /profile       -> update_profile
/// POST /select-role   -> select_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(session::logout))
        .route("/logout-all", post(session::logout_all))
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/select-role", post(profile::select_role))
}
