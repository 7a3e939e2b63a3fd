pub mod dto;
pub mod handlers;
pub mod repo;

use crate::state::AppState;
use axum::Router;

/// Reserved category whose tasks materialize the workout view.
pub const WORKOUT_CATEGORY: &str = "Exercise";

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::task_routes())
}
