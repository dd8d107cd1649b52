//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, oauth, plans};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST     /register              -> register
/// POST     /login                 -> login
/// GET|POST /{provider}/callback   -> oauth callback
/// POST     /subscribe/{plan_id}   -> subscribe (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/{provider}/callback",
            get(oauth::callback).post(oauth::callback),
        )
        .route("/subscribe/{plan_id}", post(plans::subscribe))
}
