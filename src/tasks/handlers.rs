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
    state::AppState,
    tasks::repo::{Task, TaskValues},
    tasks::WORKOUT_CATEGORY,
};

use super::dto::{
    CompleteTaskRequest, CreateTaskRequest, TaskFilter, TaskResponse, UpdateTaskRequest,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/complete", post(complete_task))
        .route("/workouts", get(list_workouts))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    if payload.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Task description must not be empty".into(),
        ));
    }

    let task = Task::create(
        &state.db,
        user_id,
        TaskValues {
            title: payload.title.as_deref(),
            description: payload.description.trim(),
            difficulty: payload.difficulty,
            category: payload.category.as_deref(),
            deadline: payload.deadline,
        },
    )
    .await?;

    info!(user_id = %user_id, task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task.into())))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = Task::list_by_user(
        &state.db,
        user_id,
        filter.category.as_deref(),
        filter.completed,
    )
    .await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// The workout view: tasks in the reserved "Exercise" category.
#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = Task::list_by_user(&state.db, user_id, Some(WORKOUT_CATEGORY), None).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = Task::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;
    Ok(Json(task.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    if payload.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Task description must not be empty".into(),
        ));
    }

    let task = Task::update(
        &state.db,
        user_id,
        id,
        TaskValues {
            title: payload.title.as_deref(),
            description: payload.description.trim(),
            difficulty: payload.difficulty,
            category: payload.category.as_deref(),
            deadline: payload.deadline,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    Ok(Json(task.into()))
}

#[instrument(skip(state, payload))]
pub async fn complete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteTaskRequest>>,
) -> Result<Json<TaskResponse>, ApiError> {
    // Empty body means "mark done"; {"completed": false} un-completes.
    let completed = payload.map(|Json(p)| p.completed).unwrap_or(true);
    let task = Task::set_completed(&state.db, user_id, id, completed)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;
    Ok(Json(task.into()))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !Task::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Task not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
