//! Repository for the `sessions` table (the session registry).
//!
//! One row is written per successful login. Rows are never deleted: logout
//! flips `is_active`, and expiry is evaluated at query time. The bearer
//! token itself is not stored, only its SHA-256 digest.

use chrono::{Duration, Utc};
use mentorly_core::hashing::sha256_hex;
use mentorly_core::session_id::{generate_session_id, SESSION_LIFETIME_DAYS};
use mentorly_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::Session;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, token_hash, created_at, expires_at, is_active";

/// Errors returned by session lookups and single-session revocation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No active, unexpired session matches the presented token.
    #[error("Session not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides the session registry operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Record a new login session for `token`, valid for [`SESSION_LIFETIME_DAYS`].
    pub async fn create(
        pool: &PgPool,
        account_id: DbId,
        token: &str,
    ) -> Result<Session, sqlx::Error> {
        let created_at = Utc::now();
        let expires_at = created_at + Duration::days(SESSION_LIFETIME_DAYS);

        let query = format!(
            "INSERT INTO sessions (id, account_id, token_hash, created_at, expires_at, is_active)
             VALUES ($1, $2, $3, $4, $5, true)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(generate_session_id())
            .bind(account_id)
            .bind(sha256_hex(token.as_bytes()))
            .bind(created_at)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find the active, unexpired session issued with `token`.
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Session, SessionError> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE token_hash = $1
               AND is_active = true
               AND expires_at > NOW()
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(sha256_hex(token.as_bytes()))
            .fetch_optional(pool)
            .await?
            .ok_or(SessionError::NotFound)
    }

    /// Deactivate the session issued with `token`.
    ///
    /// Fails with [`SessionError::NotFound`] when no active session matched,
    /// including when the session was already revoked.
    pub async fn revoke(pool: &PgPool, token: &str) -> Result<(), SessionError> {
        let result = sqlx::query(
            "UPDATE sessions SET is_active = false WHERE token_hash = $1 AND is_active = true",
        )
        .bind(sha256_hex(token.as_bytes()))
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }

    /// Deactivate every session owned by an account. Returns the number of
    /// rows touched; zero is not an error.
    pub async fn revoke_all_for_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE sessions SET is_active = false WHERE account_id = $1")
            .bind(account_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// List every session (active or not) for an account, newest first.
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions WHERE account_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }
}
