use std::str::FromStr;

use mentorly_events::DEFAULT_QUEUE_CAPACITY;

use crate::auth::jwt::JwtConfig;
use crate::auth::oauth::OAuthConfig;

/// Whether request authorization also requires an active session row.
///
/// With [`SessionPolicy::Enforce`] a logged-out token is rejected on the
/// next request even though its signature is still valid. With
/// [`SessionPolicy::TokenOnly`] any unexpired, correctly signed token is
/// accepted and logout only clears the registry and the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPolicy {
    #[default]
    Enforce,
    TokenOnly,
}

impl SessionPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPolicy::Enforce => "enforce",
            SessionPolicy::TokenOnly => "token-only",
        }
    }
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" => Ok(SessionPolicy::Enforce),
            "token-only" | "token_only" => Ok(SessionPolicy::TokenOnly),
            other => Err(format!(
                "unknown session policy '{other}', expected 'enforce' or 'token-only'"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub session_policy: SessionPolicy,
    /// Base URL OAuth callbacks redirect to (default: `http://localhost:5173`).
    pub frontend_url: String,
    pub oauth: OAuthConfig,
    /// Timeout for calls to OAuth providers in seconds (default: `10`).
    pub oauth_timeout_secs: u64,
    pub email_queue_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `AUTH_SESSION_CHECK`   | `enforce`                  |
    /// | `FRONTEND_URL`         | `http://localhost:5173`    |
    /// | `OAUTH_TIMEOUT_SECS`   | `10`                       |
    /// | `EMAIL_QUEUE_CAPACITY` | `256`                      |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values and when `JWT_SECRET` is missing.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_policy = std::env::var("AUTH_SESSION_CHECK")
            .map(|v| v.parse().unwrap_or_else(|e: String| panic!("AUTH_SESSION_CHECK: {e}")))
            .unwrap_or_default();

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        let oauth_timeout_secs: u64 = std::env::var("OAUTH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("OAUTH_TIMEOUT_SECS must be a valid u64");

        let email_queue_capacity: usize = std::env::var("EMAIL_QUEUE_CAPACITY")
            .map(|v| v.parse().expect("EMAIL_QUEUE_CAPACITY must be a valid usize"))
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            session_policy,
            frontend_url,
            oauth: OAuthConfig::from_env(),
            oauth_timeout_secs,
            email_queue_capacity,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_policy_parses_known_values() {
        assert_eq!("enforce".parse::<SessionPolicy>(), Ok(SessionPolicy::Enforce));
        assert_eq!("Token-Only".parse::<SessionPolicy>(), Ok(SessionPolicy::TokenOnly));
        assert!("sometimes".parse::<SessionPolicy>().is_err());
        assert_eq!(SessionPolicy::default(), SessionPolicy::Enforce);
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
