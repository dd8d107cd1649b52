//! Role gate extractors.
//!
//! Gates run after [`AuthUser`] and load the account's current role from the
//! database, so a role change takes effect on the next request.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mentorly_core::error::CoreError;
use mentorly_core::roles::ROLE_ADMIN;
use mentorly_db::repositories::{AccountRepo, RoleRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(state, &user, ROLE_ADMIN).await?;
        Ok(RequireAdmin(user))
    }
}

/// Reject with 403 unless `user` currently holds the role named `required`.
pub async fn require_role(
    state: &AppState,
    user: &AuthUser,
    required: &str,
) -> Result<(), AppError> {
    let account = AccountRepo::find_by_id(&state.pool, user.account_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

    match RoleRepo::resolve_name(&state.pool, account.role()).await? {
        Some(role) if role == required => Ok(()),
        Some(role) => {
            tracing::debug!(account_id = account.id, %role, required, "Role gate rejected request");
            Err(AppError::Core(CoreError::Forbidden(format!(
                "Role '{required}' required"
            ))))
        }
        None => Err(AppError::Core(CoreError::Forbidden(
            "No role selected for this account".into(),
        ))),
    }
}
