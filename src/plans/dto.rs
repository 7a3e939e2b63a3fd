use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::plans::repo::{MealPlan, Slot};
use crate::schedule::{DayOfWeek, MealTime};

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_activated_at: Option<OffsetDateTime>,
}

impl From<MealPlan> for PlanResponse {
    fn from(p: MealPlan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
            last_activated_at: p.last_activated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanDetails {
    #[serde(flatten)]
    pub plan: PlanResponse,
    pub slots: Vec<SlotResponse>,
}

#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub id: Uuid,
    pub day: DayOfWeek,
    pub time: MealTime,
    pub meal_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<Slot> for SlotResponse {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            day: s.day_of_week,
            time: s.meal_time,
            meal_id: s.meal_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Body of POST /plans/:id/slots. Either `day` for a single assignment or
/// `repeat: true` for the same meal time across all seven days.
#[derive(Debug, Deserialize)]
pub struct AssignSlotRequest {
    pub meal_id: Uuid,
    pub time: MealTime,
    pub day: Option<DayOfWeek>,
    #[serde(default)]
    pub repeat: bool,
}

/// Query of DELETE /plans/:id/slots.
#[derive(Debug, Deserialize)]
pub struct ClearSlotQuery {
    pub day: DayOfWeek,
    pub time: MealTime,
}

#[derive(Debug, Serialize)]
pub struct AssignmentFailure {
    pub day: DayOfWeek,
    pub time: MealTime,
    pub error: String,
}

/// Outcome of a slot assignment. The repeat directive is a batch of
/// independent upserts; items that succeeded before a failure stay committed
/// and the caller retries only the failed subset.
#[derive(Debug, Serialize)]
pub struct AssignmentReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub slots: Vec<SlotResponse>,
    pub failures: Vec<AssignmentFailure>,
}
