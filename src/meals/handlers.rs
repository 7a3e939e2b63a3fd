use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::error::ErrorKind;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    meals::repo::Meal,
    state::AppState,
};

use super::dto::{
    CreateMealRequest, MealListItem, MealResponse, Pagination, UpdateMealRequest,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Meal name must not be empty".into()));
    }

    let (meal, nutrition) = Meal::create(
        &state.db,
        user_id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.nutrition.map(Into::into),
    )
    .await?;

    info!(user_id = %user_id, meal_id = %meal.id, "meal created");
    Ok((
        StatusCode::CREATED,
        Json(MealResponse::from_parts(meal, nutrition)),
    ))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MealListItem>>, ApiError> {
    let meals = Meal::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    let items = meals
        .into_iter()
        .map(|m| MealListItem {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, ApiError> {
    let (meal, nutrition) = Meal::get_with_nutrition(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal not found".into()))?;
    Ok(Json(MealResponse::from_parts(meal, nutrition)))
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Meal name must not be empty".into()));
    }

    let (meal, nutrition) = Meal::update(
        &state.db,
        user_id,
        id,
        payload.name.trim(),
        payload.description.as_deref(),
        payload.nutrition.map(Into::into),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Meal not found".into()))?;

    Ok(Json(MealResponse::from_parts(meal, nutrition)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Meal::delete(&state.db, user_id, id).await.map_err(|e| {
        // Slots hold a RESTRICT reference; surface that as a caller mistake.
        let fk = e
            .as_database_error()
            .map(|d| matches!(d.kind(), ErrorKind::ForeignKeyViolation))
            .unwrap_or(false);
        if fk {
            warn!(meal_id = %id, "meal still assigned to a plan");
            ApiError::Validation("Meal is still assigned to a plan slot".into())
        } else {
            ApiError::from(e)
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Meal not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
