use axum::routing::get;
use axum::Router;

use crate::handlers::oauth;
use crate::state::AppState;

/// Routes mounted at `/oauth`.
pub fn router() -> Router<AppState> {
    Router::new().route("/{provider}/url", get(oauth::auth_url))
}
