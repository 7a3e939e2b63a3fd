use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    plans::repo::{DaySlot, MealPlan},
    schedule::{day_of_week, parse_calendar_date},
    state::AppState,
    tasks::dto::TaskResponse,
    tasks::repo::Task,
};

use super::dto::{ActivePlanSummary, DayResolution, MealsByTime};

pub fn calendar_routes() -> Router<AppState> {
    Router::new().route("/calendar/:date", get(resolve_day))
}

/// Resolves a calendar date to the active plan's meals for that weekday,
/// merged with the tasks due that day.
///
/// A user with no plans or no tasks gets empty collections, never an error.
#[instrument(skip(state))]
pub async fn resolve_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(raw_date): Path<String>,
) -> Result<Json<DayResolution>, ApiError> {
    let date = parse_calendar_date(&raw_date)?;
    let weekday = day_of_week(date);

    let plan = MealPlan::most_recent(&state.db, user_id).await?;

    let Some(plan) = plan else {
        debug!(user_id = %user_id, "no meal plans; resolving tasks only");
        let tasks = Task::due_on(&state.db, user_id, date).await?;
        return Ok(Json(DayResolution {
            date,
            day_of_week: weekday,
            plan: None,
            meals_by_time: MealsByTime::default(),
            tasks_due: tasks.into_iter().map(TaskResponse::from).collect(),
        }));
    };

    // The two halves are independent; fetch them concurrently.
    let (slots, tasks) = tokio::join!(
        DaySlot::for_plan_day(&state.db, plan.id, weekday),
        Task::due_on(&state.db, user_id, date),
    );
    let slots = slots?;
    let tasks = tasks?;

    Ok(Json(DayResolution {
        date,
        day_of_week: weekday,
        plan: Some(ActivePlanSummary {
            id: plan.id,
            name: plan.name,
        }),
        meals_by_time: MealsByTime::from_slots(slots),
        tasks_due: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}
