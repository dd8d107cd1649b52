//! Account entity model and DTOs.

use mentorly_core::roles::RoleAssignment;
use mentorly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full account row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub surname: Option<String>,
    pub password_hash: Option<String>,
    pub role_id: Option<DbId>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_subject: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Account {
    /// The account's role state.
    pub fn role(&self) -> RoleAssignment {
        RoleAssignment::from(self.role_id)
    }

    /// The stored password hash, if the account has a usable credential.
    pub fn credential(&self) -> Option<&str> {
        self.password_hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// DTO for inserting a new account.
///
/// Password registrations set `password_hash`; OAuth-created accounts set
/// the `oauth_*` fields and leave the credential empty.
#[derive(Debug, Default)]
pub struct CreateAccount {
    pub email: String,
    pub name: String,
    pub surname: Option<String>,
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_subject: Option<String>,
}

/// DTO for a partial profile update. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.phone.is_none()
            && self.bio.is_none()
            && self.avatar_url.is_none()
    }
}

/// OAuth provider metadata written onto an existing account at each OAuth login.
#[derive(Debug)]
pub struct OAuthLink {
    pub provider: String,
    pub subject: String,
    pub avatar_url: Option<String>,
}
