//! Handlers for the subscription plan catalogue and subscribing to a plan.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use mentorly_core::error::CoreError;
use mentorly_core::types::DbId;
use mentorly_db::models::plan::{Plan, PlanInput, Subscription};
use mentorly_db::repositories::{PlanRepo, SubscriptionRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating or replacing a plan.
#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<PlanRequest> for PlanInput {
    fn from(req: PlanRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            description: req.description,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: DbId,
    pub deleted: bool,
}

fn plan_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "plan", id })
}

/// GET /plans
pub async fn list_plans(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<Plan>>>> {
    let plans = PlanRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: plans }))
}

/// POST /plans
pub async fn create_plan(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<PlanRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Plan>>)> {
    input.validate()?;
    let plan = PlanRepo::create(&state.pool, &input.into()).await?;
    tracing::info!(account_id = admin.account_id, plan_id = plan.id, "Plan created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: plan })))
}

/// GET /plans/{id}
pub async fn get_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Plan>>> {
    let plan = PlanRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| plan_not_found(id))?;
    Ok(Json(DataResponse { data: plan }))
}

/// PUT /plans/{id}
pub async fn update_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<PlanRequest>,
) -> AppResult<Json<DataResponse<Plan>>> {
    input.validate()?;
    let plan = PlanRepo::update(&state.pool, id, &input.into())
        .await?
        .ok_or_else(|| plan_not_found(id))?;
    Ok(Json(DataResponse { data: plan }))
}

/// DELETE /plans/{id}
///
/// A plan that still has subscriptions cannot be deleted (409).
pub async fn delete_plan(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedResponse>>> {
    if !PlanRepo::delete(&state.pool, id).await? {
        return Err(plan_not_found(id));
    }
    Ok(Json(DataResponse {
        data: DeletedResponse { id, deleted: true },
    }))
}

/// POST /auth/subscribe/{plan_id}
///
/// Subscribe the signed-in account to an active plan for one month.
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(plan_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Subscription>>)> {
    let plan = PlanRepo::find_by_id(&state.pool, plan_id)
        .await?
        .ok_or_else(|| plan_not_found(plan_id))?;

    if !plan.is_active {
        return Err(AppError::BadRequest(format!("Plan {plan_id} is not active")));
    }

    let subscription =
        SubscriptionRepo::create(&state.pool, user.account_id, plan.id, Utc::now()).await?;
    tracing::info!(account_id = user.account_id, plan_id, "Subscribed to plan");

    Ok((StatusCode::CREATED, Json(DataResponse { data: subscription })))
}
