//! Login session model.

use mentorly_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `sessions` table.
///
/// Valid for authorization only while `is_active` and `expires_at` is in the future.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: String,
    pub account_id: DbId,
    pub token_hash: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
}
