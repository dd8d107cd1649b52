//! Handlers for the signed-in account's profile and role selection.

use axum::extract::State;
use axum::Json;
use mentorly_core::error::CoreError;
use mentorly_core::roles::{is_selectable, SELECTABLE_ROLES};
use mentorly_core::types::{DbId, Timestamp};
use mentorly_db::models::account::{Account, UpdateProfile};
use mentorly_db::repositories::{AccountRepo, RoleRepo};
use mentorly_events::EmailMessage;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Role name, or `null` until one is selected.
    pub role: Option<String>,
    pub has_password: bool,
    pub oauth_provider: Option<String>,
    pub created_at: Timestamp,
}

/// Request body for `PUT /user/profile`. Omitted fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 2, message = "must be at least 2 characters"))]
    pub surname: Option<String>,
    #[validate(length(max = 30, message = "must be at most 30 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub bio: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub avatar_url: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
            phone: req.phone,
            bio: req.bio,
            avatar_url: req.avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: String,
}

/// GET /user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let account = load_account(&state, user.account_id).await?;
    let profile = to_profile(&state, account).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /user/profile
///
/// Partial update; at least one field must be present. A confirmation email
/// is queued on success.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    input.validate()?;

    let update = UpdateProfile::from(input);
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let account = AccountRepo::update_profile(&state.pool, user.account_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: user.account_id,
        }))?;

    tracing::info!(account_id = account.id, operation = "update_profile", "Profile updated");
    state.send_email(EmailMessage::profile_updated(&account.email, &account.name));

    let profile = to_profile(&state, account).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /user/select-role
///
/// Assign one of the self-selectable roles (`mentor`, `entrepreneur`).
pub async fn select_role(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(input): AppJson<SelectRoleRequest>,
) -> AppResult<Json<DataResponse<ProfileResponse>>> {
    let requested = input.role.trim();
    if !is_selectable(requested) {
        return Err(AppError::BadRequest(format!(
            "Unknown role '{requested}', expected one of: {}",
            SELECTABLE_ROLES.join(", ")
        )));
    }

    let role = RoleRepo::find_by_name(&state.pool, requested)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown role '{requested}'")))?;

    if !AccountRepo::set_role(&state.pool, user.account_id, role.id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "account",
            id: user.account_id,
        }));
    }
    tracing::info!(account_id = user.account_id, role = %role.name, "Role selected");

    let account = load_account(&state, user.account_id).await?;
    let profile = to_profile(&state, account).await?;
    Ok(Json(DataResponse { data: profile }))
}

async fn load_account(state: &AppState, id: DbId) -> AppResult<Account> {
    AccountRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "account",
            id,
        }))
}

async fn to_profile(state: &AppState, account: Account) -> AppResult<ProfileResponse> {
    let role = RoleRepo::resolve_name(&state.pool, account.role()).await?;
    let has_password = account.credential().is_some();

    Ok(ProfileResponse {
        id: account.id,
        email: account.email,
        name: account.name,
        surname: account.surname,
        phone: account.phone,
        bio: account.bio,
        avatar_url: account.avatar_url,
        role,
        has_password,
        oauth_provider: account.oauth_provider,
        created_at: account.created_at,
    })
}
