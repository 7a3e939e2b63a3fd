use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Task difficulty scale. Stored as lowercase text; null means unrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Personal task. Lives independently of meal plans; the calendar joins it
/// to a day only by deadline-date equality.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub is_completed: bool,
    pub deadline: Option<Date>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub struct TaskValues<'a> {
    pub title: Option<&'a str>,
    pub description: &'a str,
    pub difficulty: Option<Difficulty>,
    pub category: Option<&'a str>,
    pub deadline: Option<Date>,
}

impl Task {
    pub async fn create(db: &PgPool, user_id: Uuid, v: TaskValues<'_>) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, difficulty, category, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, difficulty, category,
                      is_completed, deadline, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(v.title)
        .bind(v.description)
        .bind(v.difficulty)
        .bind(v.category)
        .bind(v.deadline)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        category: Option<&str>,
        completed: Option<bool>,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, difficulty, category,
                   is_completed, deadline, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::boolean IS NULL OR is_completed = $3)
            ORDER BY deadline ASC NULLS LAST, created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(category)
        .bind(completed)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, difficulty, category,
                   is_completed, deadline, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
        v: TaskValues<'_>,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, difficulty = $5, category = $6,
                deadline = $7, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, difficulty, category,
                      is_completed, deadline, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(v.title)
        .bind(v.description)
        .bind(v.difficulty)
        .bind(v.category)
        .bind(v.deadline)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn set_completed(
        db: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
        completed: bool,
    ) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET is_completed = $3, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, difficulty, category,
                      is_completed, deadline, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(completed)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Tasks whose deadline equals the given civil date. Tasks without a
    /// deadline never match.
    pub async fn due_on(db: &PgPool, user_id: Uuid, date: Date) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, difficulty, category,
                   is_completed, deadline, created_at, updated_at
            FROM tasks
            WHERE user_id = $1 AND deadline = $2
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
