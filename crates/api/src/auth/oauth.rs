//! Third-party login: provider configuration, authorize URLs, and the
//! authorization-code exchange.
//!
//! The exchange sits behind the [`OAuthExchange`] trait so the callback
//! handler can be driven by a stub in tests. [`HttpOAuthClient`] is the
//! production implementation backed by `reqwest`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use mentorly_core::session_id::random_hex;
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Google,
    GitHub,
    LinkedIn,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Google, Provider::GitHub, Provider::LinkedIn];

    /// Path segment and stored `oauth_provider` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::GitHub => "github",
            Provider::LinkedIn => "linkedin",
        }
    }

    fn env_prefix(self) -> &'static str {
        match self {
            Provider::Google => "GOOGLE",
            Provider::GitHub => "GITHUB",
            Provider::LinkedIn => "LINKEDIN",
        }
    }

    fn authorize_endpoint(self) -> &'static str {
        match self {
            Provider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            Provider::GitHub => "https://github.com/login/oauth/authorize",
            Provider::LinkedIn => "https://www.linkedin.com/oauth/v2/authorization",
        }
    }

    fn token_endpoint(self) -> &'static str {
        match self {
            Provider::Google => "https://oauth2.googleapis.com/token",
            Provider::GitHub => "https://github.com/login/oauth/access_token",
            Provider::LinkedIn => "https://www.linkedin.com/oauth/v2/accessToken",
        }
    }

    fn scope(self) -> &'static str {
        match self {
            Provider::Google => "openid email profile",
            Provider::GitHub => "read:user user:email",
            Provider::LinkedIn => "r_liteprofile r_emailaddress",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = OAuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| OAuthError::UnknownProvider(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Unknown OAuth provider: {0}")]
    UnknownProvider(String),

    #[error("OAuth provider {0} is not configured")]
    NotConfigured(Provider),

    #[error("Authorization code not provided")]
    MissingCode,

    /// The provider redirected back with an `error` parameter.
    #[error("Provider returned an error: {0}")]
    Denied(String),

    #[error("Provider did not return a verified email address")]
    MissingEmail,

    /// The callback's `state` is absent or not the one this browser was issued.
    #[error("OAuth state is missing or does not match")]
    StateMismatch,

    #[error("OAuth exchange failed: {0}")]
    Exchange(String),

    #[error("OAuth HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Client registration for one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

/// Per-provider client registrations. A provider is enabled only when both
/// its client id and secret are set.
#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
    pub google: Option<ProviderCredentials>,
    pub github: Option<ProviderCredentials>,
    pub linkedin: Option<ProviderCredentials>,
}

impl OAuthConfig {
    /// Load `{GOOGLE,GITHUB,LINKEDIN}_{CLIENT_ID,CLIENT_SECRET,REDIRECT_URL}`.
    pub fn from_env() -> Self {
        Self {
            google: credentials_from_env(Provider::Google),
            github: credentials_from_env(Provider::GitHub),
            linkedin: credentials_from_env(Provider::LinkedIn),
        }
    }

    pub fn credentials(&self, provider: Provider) -> Option<&ProviderCredentials> {
        match provider {
            Provider::Google => self.google.as_ref(),
            Provider::GitHub => self.github.as_ref(),
            Provider::LinkedIn => self.linkedin.as_ref(),
        }
    }

    pub fn enabled(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.credentials(*p).is_some())
            .collect()
    }
}

fn credentials_from_env(provider: Provider) -> Option<ProviderCredentials> {
    let prefix = provider.env_prefix();
    let var = |suffix: &str| {
        std::env::var(format!("{prefix}_{suffix}"))
            .ok()
            .filter(|v| !v.is_empty())
    };

    Some(ProviderCredentials {
        client_id: var("CLIENT_ID")?,
        client_secret: var("CLIENT_SECRET")?,
        redirect_url: var("REDIRECT_URL").unwrap_or_default(),
    })
}

/// Random bytes behind each authorization `state` value.
pub const STATE_BYTES: usize = 16;

/// A fresh `state` value for one authorization round trip.
pub fn new_state() -> String {
    random_hex(STATE_BYTES)
}

/// The value stored in the browser's state cookie: the state bound to the
/// provider it was issued for.
pub fn state_binding(provider: Provider, state: &str) -> String {
    format!("{provider}.{state}")
}

/// Check the callback's `state` against the browser's state cookie.
pub fn check_state(
    provider: Provider,
    cookie: Option<&str>,
    presented: Option<&str>,
) -> Result<(), OAuthError> {
    match (cookie, presented) {
        (Some(cookie), Some(state)) if !state.is_empty() && cookie == state_binding(provider, state) => {
            Ok(())
        }
        _ => Err(OAuthError::StateMismatch),
    }
}

/// Build the provider's authorization URL the frontend redirects to.
pub fn authorize_url(
    provider: Provider,
    creds: &ProviderCredentials,
    state: &str,
) -> Result<Url, OAuthError> {
    Url::parse_with_params(
        provider.authorize_endpoint(),
        &[
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", creds.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", provider.scope()),
            ("state", state),
        ],
    )
    .map_err(|e| OAuthError::Exchange(e.to_string()))
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

/// Identity reported by a provider after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider: Provider,
    /// Provider-side stable user id.
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Exchanges an authorization code for the user's provider profile.
#[async_trait]
pub trait OAuthExchange: Send + Sync {
    async fn exchange(&self, provider: Provider, code: &str) -> Result<OAuthProfile, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    verified_email: bool,
    #[serde(default)]
    name: String,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    #[serde(default)]
    verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedInUser {
    id: String,
    #[serde(default)]
    localized_first_name: String,
    #[serde(default)]
    localized_last_name: String,
}

#[derive(Debug, Deserialize)]
struct LinkedInEmails {
    #[serde(default)]
    elements: Vec<LinkedInEmailElement>,
}

#[derive(Debug, Deserialize)]
struct LinkedInEmailElement {
    #[serde(rename = "handle~")]
    handle: Option<LinkedInHandle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkedInHandle {
    email_address: String,
}

const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_EMAILS_URL: &str = "https://api.github.com/user/emails";
const LINKEDIN_ME_URL: &str = "https://api.linkedin.com/v2/me";
const LINKEDIN_EMAIL_URL: &str =
    "https://api.linkedin.com/v2/emailAddress?q=members&projection=(elements*(handle~))";

/// `reqwest`-backed [`OAuthExchange`] talking to the real providers.
pub struct HttpOAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl HttpOAuthClient {
    pub fn new(config: OAuthConfig, timeout: Duration) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mentorly-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    async fn access_token(
        &self,
        provider: Provider,
        creds: &ProviderCredentials,
        code: &str,
    ) -> Result<String, OAuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("redirect_uri", creds.redirect_url.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post(provider.token_endpoint())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        match response {
            TokenResponse {
                access_token: Some(token),
                ..
            } if !token.is_empty() => Ok(token),
            TokenResponse {
                error,
                error_description,
                ..
            } => Err(OAuthError::Exchange(format!(
                "{} token endpoint: {} {}",
                provider,
                error.unwrap_or_else(|| "no access token".into()),
                error_description.unwrap_or_default()
            ))),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, OAuthError> {
        let value = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn google_profile(&self, token: &str) -> Result<OAuthProfile, OAuthError> {
        let user: GoogleUser = self.get_json(GOOGLE_USERINFO_URL, token).await?;
        google_profile(user)
    }

    async fn github_profile(&self, token: &str) -> Result<OAuthProfile, OAuthError> {
        let user: GitHubUser = self.get_json(GITHUB_USER_URL, token).await?;
        // The public profile email carries no verification flag.
        let emails: Vec<GitHubEmail> = self.get_json(GITHUB_EMAILS_URL, token).await?;
        github_profile(user, emails)
    }

    async fn linkedin_profile(&self, token: &str) -> Result<OAuthProfile, OAuthError> {
        let user: LinkedInUser = self.get_json(LINKEDIN_ME_URL, token).await?;
        let emails: LinkedInEmails = self.get_json(LINKEDIN_EMAIL_URL, token).await?;

        let email = emails
            .elements
            .into_iter()
            .find_map(|e| e.handle.map(|h| h.email_address))
            .unwrap_or_default();

        Ok(OAuthProfile {
            provider: Provider::LinkedIn,
            subject: user.id,
            email,
            name: format!("{} {}", user.localized_first_name, user.localized_last_name)
                .trim()
                .to_string(),
            avatar_url: None,
        })
    }
}

/// Accounts are linked by email, so only a provider-verified address is used.
fn google_profile(user: GoogleUser) -> Result<OAuthProfile, OAuthError> {
    if !user.verified_email || user.email.is_empty() {
        return Err(OAuthError::MissingEmail);
    }
    Ok(OAuthProfile {
        provider: Provider::Google,
        subject: user.id,
        email: user.email,
        name: user.name,
        avatar_url: user.picture.filter(|p| !p.is_empty()),
    })
}

fn github_profile(user: GitHubUser, emails: Vec<GitHubEmail>) -> Result<OAuthProfile, OAuthError> {
    let email = emails
        .into_iter()
        .find(|e| e.primary && e.verified && !e.email.is_empty())
        .map(|e| e.email)
        .ok_or(OAuthError::MissingEmail)?;

    Ok(OAuthProfile {
        provider: Provider::GitHub,
        subject: user.id.to_string(),
        email,
        name: user.name.filter(|n| !n.is_empty()).unwrap_or(user.login),
        avatar_url: user.avatar_url,
    })
}

#[async_trait]
impl OAuthExchange for HttpOAuthClient {
    async fn exchange(&self, provider: Provider, code: &str) -> Result<OAuthProfile, OAuthError> {
        let creds = self
            .config
            .credentials(provider)
            .ok_or(OAuthError::NotConfigured(provider))?;

        let token = self.access_token(provider, creds, code).await?;

        let profile = match provider {
            Provider::Google => self.google_profile(&token).await?,
            Provider::GitHub => self.github_profile(&token).await?,
            Provider::LinkedIn => self.linkedin_profile(&token).await?,
        };

        if profile.email.is_empty() {
            return Err(OAuthError::MissingEmail);
        }

        tracing::debug!(provider = %provider, subject = %profile.subject, "OAuth code exchanged");
        Ok(profile)
    }
}
