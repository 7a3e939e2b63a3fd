use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::tasks::repo::{Difficulty, Task};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub deadline: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub deadline: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    #[serde(default = "default_completed")]
    pub completed: bool,
}
fn default_completed() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub is_completed: bool,
    pub deadline: Option<Date>,
    pub created_at: OffsetDateTime,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            difficulty: t.difficulty,
            category: t.category,
            is_completed: t.is_completed,
            deadline: t.deadline,
            created_at: t.created_at,
        }
    }
}
