//! Identity resolution for third-party logins.
//!
//! Maps a provider profile onto exactly one local account keyed by email.
//! OAuth logins never go through the password path.

use mentorly_db::is_unique_violation;
use mentorly_db::models::account::{Account, CreateAccount, OAuthLink};
use mentorly_db::repositories::AccountRepo;
use sqlx::PgPool;

use super::oauth::OAuthProfile;

/// Return the account for `profile.email`, creating it if needed.
///
/// An existing account gets its provider metadata refreshed (last write
/// wins). A new account is inserted without a password credential. If a
/// concurrent request inserts the same email first, the unique violation is
/// resolved by one re-lookup so both callers see the same account.
pub async fn find_or_create_by_email(
    pool: &PgPool,
    profile: &OAuthProfile,
) -> Result<Account, sqlx::Error> {
    if let Some(existing) = AccountRepo::find_by_email(pool, &profile.email).await? {
        return link_provider(pool, existing, profile).await;
    }

    let input = CreateAccount {
        email: profile.email.clone(),
        name: display_name(profile),
        avatar_url: profile.avatar_url.clone(),
        oauth_provider: Some(profile.provider.as_str().to_string()),
        oauth_subject: Some(profile.subject.clone()),
        ..Default::default()
    };

    match AccountRepo::create(pool, &input).await {
        Ok(account) => {
            tracing::info!(
                account_id = account.id,
                provider = %profile.provider,
                "Account created from OAuth login"
            );
            Ok(account)
        }
        Err(e) if is_unique_violation(&e) => {
            tracing::debug!(provider = %profile.provider, "Concurrent OAuth signup, re-reading account");
            match AccountRepo::find_by_email(pool, &profile.email).await? {
                Some(existing) => link_provider(pool, existing, profile).await,
                None => Err(e),
            }
        }
        Err(e) => Err(e),
    }
}

async fn link_provider(
    pool: &PgPool,
    account: Account,
    profile: &OAuthProfile,
) -> Result<Account, sqlx::Error> {
    let link = OAuthLink {
        provider: profile.provider.as_str().to_string(),
        subject: profile.subject.clone(),
        avatar_url: profile.avatar_url.clone(),
    };
    AccountRepo::link_oauth(pool, account.id, &link)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Provider display name, falling back to the email's local part.
fn display_name(profile: &OAuthProfile) -> String {
    let name = profile.name.trim();
    if !name.is_empty() {
        return name.to_string();
    }
    profile
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::Provider;

    fn profile(name: &str) -> OAuthProfile {
        OAuthProfile {
            provider: Provider::Google,
            subject: "g-1".into(),
            email: "ana.lopez@test.com".into(),
            name: name.into(),
            avatar_url: None,
        }
    }

    #[test]
    fn display_name_prefers_provider_name() {
        assert_eq!(display_name(&profile(" Ana Lopez ")), "Ana Lopez");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(display_name(&profile("")), "ana.lopez");
    }
}
