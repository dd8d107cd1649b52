//! The authentication gateway: registration, password login, and logout.
//!
//! These flows only touch the credential store and the session registry.
//! Token issuance and cookie handling stay in the HTTP handlers.

use mentorly_core::roles::RoleAssignment;
use mentorly_core::types::DbId;
use mentorly_db::is_unique_violation;
use mentorly_db::models::account::{Account, CreateAccount};
use mentorly_db::repositories::{AccountRepo, SessionError, SessionRepo};
use sqlx::PgPool;

use super::password::{hash_password, verify_password, CredentialError};

/// Outcomes of the authentication flows.
///
/// `EmailTaken`, `InvalidCredentials`, and rejected passwords are expected
/// results; a credential-store fault and `Storage` are not.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

/// Validated input for a password registration.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub email: String,
    pub name: String,
    pub surname: Option<String>,
    pub password: String,
}

/// The account a successful login resolved to.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub role: RoleAssignment,
}

impl From<&Account> for AuthenticatedAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role(),
        }
    }
}

/// Create a password account. Returns the new account id.
pub async fn register(pool: &PgPool, input: &NewRegistration) -> Result<DbId, AuthError> {
    if AccountRepo::find_by_email(pool, &input.email).await?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let password_hash = hash_password(&input.password)?;

    let create = CreateAccount {
        email: input.email.clone(),
        name: input.name.clone(),
        surname: input.surname.clone(),
        password_hash: Some(password_hash),
        ..Default::default()
    };

    match AccountRepo::create(pool, &create).await {
        Ok(account) => {
            tracing::info!(account_id = account.id, operation = "register", "Account registered");
            Ok(account.id)
        }
        Err(e) if is_unique_violation(&e) => Err(AuthError::EmailTaken),
        Err(e) => Err(AuthError::Storage(e)),
    }
}

/// Check an email and password pair.
///
/// Unknown email, empty password, OAuth-only accounts, and mismatches are all
/// reported as [`AuthError::InvalidCredentials`].
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<AuthenticatedAccount, AuthError> {
    let Some(account) = AccountRepo::find_by_email(pool, email).await? else {
        tracing::info!(operation = "login", "Login for unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    let Some(stored_hash) = account.credential() else {
        tracing::info!(account_id = account.id, operation = "login", "Password login on account without credential");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, stored_hash)? {
        tracing::info!(account_id = account.id, operation = "login", "Password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(AuthenticatedAccount::from(&account))
}

/// Revoke the session for `token`. A token with no active session is
/// already logged out, so `NotFound` is success.
pub async fn logout(pool: &PgPool, token: &str) -> Result<(), AuthError> {
    match SessionRepo::revoke(pool, token).await {
        Ok(()) | Err(SessionError::NotFound) => Ok(()),
        Err(SessionError::Database(e)) => Err(AuthError::Storage(e)),
    }
}

/// Revoke every active session of `account_id`. Returns how many were revoked.
pub async fn logout_all(pool: &PgPool, account_id: DbId) -> Result<u64, AuthError> {
    let revoked = SessionRepo::revoke_all_for_account(pool, account_id).await?;
    tracing::info!(account_id, revoked, operation = "logout_all", "Sessions revoked");
    Ok(revoked)
}
