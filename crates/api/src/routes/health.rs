//! `GET /health`: liveness plus the auth-relevant runtime configuration.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// `enforce` or `token-only`: whether logged-out tokens are refused.
    pub session_policy: &'static str,
    /// Providers with client credentials configured.
    pub oauth_providers: Vec<&'static str>,
    pub email_enabled: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match mentorly_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        session_policy: state.config.session_policy.as_str(),
        oauth_providers: state
            .config
            .oauth
            .enabled()
            .into_iter()
            .map(|p| p.as_str())
            .collect(),
        email_enabled: state.mailer.is_some(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
