//! The credential store: how account passwords are accepted, stored, and checked.
//!
//! Credentials are Argon2id PHC strings. An empty password is never a
//! credential: it cannot be stored and it never verifies, whatever the stored
//! hash is.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum password length accepted at registration, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password must not be empty")]
    Empty,

    #[error("password must be at least {min} characters long")]
    TooShort { min: usize },

    /// Hashing itself failed (RNG or parameter failure).
    #[error("could not hash password: {0}")]
    Hash(String),

    /// The stored credential is not a parseable PHC string.
    #[error("stored credential is corrupt: {0}")]
    Corrupt(String),
}

impl CredentialError {
    /// Whether the caller supplied an unacceptable password, as opposed to a
    /// fault in the store.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CredentialError::Empty | CredentialError::TooShort { .. })
    }
}

/// Check a new password against the registration policy.
pub fn check_new_password(password: &str) -> Result<(), CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::Empty);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Turn an accepted password into a storable credential.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    check_new_password(password)?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Check a presented password against a stored credential.
///
/// Empty passwords and mismatches are `Ok(false)`. Only a corrupt stored
/// credential is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CredentialError> {
    if password.is_empty() {
        return Ok(false);
    }
    let parsed = PasswordHash::new(stored).map_err(|e| CredentialError::Corrupt(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Corrupt(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn stored_credential_is_argon2id_and_verifies() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(verify_password("correct-horse", &hash), Ok(true));
        assert_eq!(verify_password("wrong-horse", &hash), Ok(false));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
        assert_eq!(verify_password("secret1", &b), Ok(true));
    }

    #[test]
    fn empty_password_is_never_a_credential() {
        assert_eq!(hash_password(""), Err(CredentialError::Empty));

        let hash = hash_password("secret1").unwrap();
        assert_eq!(verify_password("", &hash), Ok(false));
        // Not even against a corrupt credential.
        assert_eq!(verify_password("", "garbage"), Ok(false));
    }

    #[test]
    fn short_passwords_are_rejected_by_character_count() {
        assert_eq!(
            check_new_password("abc"),
            Err(CredentialError::TooShort { min: MIN_PASSWORD_LENGTH })
        );
        // Six characters, more than six bytes.
        assert_eq!(check_new_password("pässwö"), Ok(()));
    }

    #[test]
    fn corrupt_credential_is_a_fault() {
        let err = verify_password("secret1", "not-a-phc-string").unwrap_err();
        assert_matches!(err, CredentialError::Corrupt(_));
        assert!(!err.is_rejection());
        assert!(CredentialError::Empty.is_rejection());
    }
}
