//! Repository for the `subscriptions` table.

use chrono::Months;
use mentorly_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::plan::Subscription;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, plan_id, starts_at, expires_at, created_at";

/// Provides operations for plan subscriptions.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Subscribe an account to a plan for one calendar month from `starts_at`.
    pub async fn create(
        pool: &PgPool,
        account_id: DbId,
        plan_id: DbId,
        starts_at: Timestamp,
    ) -> Result<Subscription, sqlx::Error> {
        let expires_at = starts_at
            .checked_add_months(Months::new(1))
            .unwrap_or(starts_at);

        let query = format!(
            "INSERT INTO subscriptions (account_id, plan_id, starts_at, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(account_id)
            .bind(plan_id)
            .bind(starts_at)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// List an account's subscriptions, newest first.
    pub async fn list_for_account(
        pool: &PgPool,
        account_id: DbId,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE account_id = $1 ORDER BY starts_at DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(account_id)
            .fetch_all(pool)
            .await
    }
}
