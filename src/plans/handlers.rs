use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    plans::repo::{MealPlan, Slot},
    state::AppState,
};

use super::dto::{
    AssignSlotRequest, AssignmentReport, ClearSlotQuery, CreatePlanRequest, PlanDetails,
    PlanResponse, SlotResponse, UpdatePlanRequest,
};
use super::services::assign_meal;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/active", get(active_plan))
        .route(
            "/plans/:id",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
        .route("/plans/:id/touch", post(touch_plan))
        .route(
            "/plans/:id/slots",
            get(list_slots).post(assign_slot).delete(clear_slot),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Plan name must not be empty".into()));
    }

    let plan = MealPlan::create(
        &state.db,
        user_id,
        payload.name.trim(),
        payload.description.as_deref(),
    )
    .await?;

    info!(user_id = %user_id, plan_id = %plan.id, "meal plan created");
    Ok((StatusCode::CREATED, Json(plan.into())))
}

#[instrument(skip(state))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<PlanResponse>>, ApiError> {
    let plans = MealPlan::list_by_user(&state.db, user_id).await?;
    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// The plan the calendar resolves against, surfaced directly.
#[instrument(skip(state))]
pub async fn active_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Option<PlanResponse>>, ApiError> {
    let plan = MealPlan::most_recent(&state.db, user_id).await?;
    Ok(Json(plan.map(PlanResponse::from)))
}

#[instrument(skip(state))]
pub async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanDetails>, ApiError> {
    let plan = MealPlan::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".into()))?;
    let slots = Slot::list_for_plan(&state.db, plan.id).await?;
    Ok(Json(PlanDetails {
        plan: plan.into(),
        slots: slots.into_iter().map(SlotResponse::from).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Plan name must not be empty".into()));
    }

    let plan = MealPlan::update(
        &state.db,
        user_id,
        id,
        payload.name.trim(),
        payload.description.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Meal plan not found".into()))?;

    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !MealPlan::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Meal plan not found".into()));
    }
    info!(user_id = %user_id, plan_id = %id, "meal plan deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Explicit recency bump. Slot writes deliberately do not do this; the
/// client decides when a plan becomes the active one.
#[instrument(skip(state))]
pub async fn touch_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanResponse>, ApiError> {
    let plan = MealPlan::touch(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Plan does not belong to caller".into()))?;
    info!(user_id = %user_id, plan_id = %id, "meal plan touched");
    Ok(Json(plan.into()))
}

#[instrument(skip(state))]
pub async fn list_slots(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SlotResponse>>, ApiError> {
    let plan = MealPlan::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".into()))?;
    let slots = Slot::list_for_plan(&state.db, plan.id).await?;
    Ok(Json(slots.into_iter().map(SlotResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn assign_slot(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignSlotRequest>,
) -> Result<Json<AssignmentReport>, ApiError> {
    let report = assign_meal(&state.db, user_id, id, &payload).await?;
    Ok(Json(report))
}

#[instrument(skip(state))]
pub async fn clear_slot(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(q): Query<ClearSlotQuery>,
) -> Result<StatusCode, ApiError> {
    let plan = MealPlan::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".into()))?;
    if !Slot::clear(&state.db, plan.id, q.day, q.time).await? {
        return Err(ApiError::NotFound("Slot is empty".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
