use std::sync::Arc;

use mentorly_events::{EmailMessage, EmailQueue};

use crate::auth::jwt::TokenCodec;
use crate::auth::oauth::OAuthExchange;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: mentorly_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// The only holder of signing keys.
    pub tokens: Arc<TokenCodec>,
    pub oauth: Arc<dyn OAuthExchange>,
    /// `None` when SMTP is not configured.
    pub mailer: Option<EmailQueue>,
}

impl AppState {
    /// Queue an email if delivery is configured. Never blocks the request.
    pub fn send_email(&self, message: EmailMessage) {
        match &self.mailer {
            Some(queue) => {
                queue.submit(message);
            }
            None => {
                tracing::debug!(to = %message.to, "Email delivery disabled, skipping message");
            }
        }
    }
}
