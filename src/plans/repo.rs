use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::schedule::{DayOfWeek, MealTime};

/// Meal plan record. `last_activated_at` is the recency signal that selects
/// the "active" plan for calendar resolution; it is decoupled from
/// `updated_at` so unrelated edits never change which plan is active.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_activated_at: Option<OffsetDateTime>,
}

/// One (plan, day, time) → meal assignment. Never exists empty; the unique
/// index on the triple makes the upsert race-free.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Slot {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub meal_time: MealTime,
    pub meal_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Slot joined with its meal, as the calendar view consumes it.
#[derive(Debug, Clone, FromRow)]
pub struct DaySlot {
    pub meal_time: MealTime,
    pub meal_id: Uuid,
    pub meal_name: String,
    pub meal_description: Option<String>,
}

impl MealPlan {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> anyhow::Result<MealPlan> {
        // A new plan is immediately resolvable as the active one.
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans (user_id, name, description, last_activated_at)
            VALUES ($1, $2, $3, now())
            RETURNING id, user_id, name, description, created_at, updated_at, last_activated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(db)
        .await?;
        Ok(plan)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MealPlan>> {
        let rows = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at, last_activated_at
            FROM meal_plans
            WHERE user_id = $1
            ORDER BY COALESCE(last_activated_at, created_at) DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at, last_activated_at
            FROM meal_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> anyhow::Result<Option<MealPlan>> {
        // Touches updated_at only; editing a plan does not make it active.
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            UPDATE meal_plans
            SET name = $3, description = $4, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, created_at, updated_at, last_activated_at
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// Deletes the plan; slot assignments cascade at the storage layer.
    pub async fn delete(db: &PgPool, user_id: Uuid, plan_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM meal_plans WHERE id = $1 AND user_id = $2")
            .bind(plan_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Marks the plan as the most recently active one for its owner.
    /// Returns None when the plan is missing or owned by someone else.
    pub async fn touch(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            UPDATE meal_plans
            SET last_activated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, created_at, updated_at, last_activated_at
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    /// The user's active plan: maximum recency, id as the deterministic
    /// tie-break for equal timestamps within a snapshot.
    pub async fn most_recent(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at, last_activated_at
            FROM meal_plans
            WHERE user_id = $1
            ORDER BY COALESCE(last_activated_at, created_at) DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }
}

impl Slot {
    /// Insert-or-overwrite by the (plan, day, time) composite key.
    ///
    /// A second assignment to an occupied slot replaces the meal reference in
    /// place, keeping the slot's id and created_at. One statement, so the
    /// at-most-one-meal invariant holds under concurrent writers.
    pub async fn upsert(
        db: &PgPool,
        plan_id: Uuid,
        meal_id: Uuid,
        day: DayOfWeek,
        time: MealTime,
    ) -> anyhow::Result<Slot> {
        let slot = sqlx::query_as::<_, Slot>(
            r#"
            INSERT INTO meal_plan_slots (plan_id, day_of_week, meal_time, meal_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (plan_id, day_of_week, meal_time) DO UPDATE
            SET meal_id = EXCLUDED.meal_id, updated_at = now()
            RETURNING id, plan_id, day_of_week, meal_time, meal_id, created_at, updated_at
            "#,
        )
        .bind(plan_id)
        .bind(day)
        .bind(time)
        .bind(meal_id)
        .fetch_one(db)
        .await?;
        Ok(slot)
    }

    pub async fn list_for_plan(db: &PgPool, plan_id: Uuid) -> anyhow::Result<Vec<Slot>> {
        let rows = sqlx::query_as::<_, Slot>(
            r#"
            SELECT id, plan_id, day_of_week, meal_time, meal_id, created_at, updated_at
            FROM meal_plan_slots
            WHERE plan_id = $1
            ORDER BY day_of_week, meal_time
            "#,
        )
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Removes a single assignment; Ok(false) when the slot was already empty.
    pub async fn clear(
        db: &PgPool,
        plan_id: Uuid,
        day: DayOfWeek,
        time: MealTime,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM meal_plan_slots
            WHERE plan_id = $1 AND day_of_week = $2 AND meal_time = $3
            "#,
        )
        .bind(plan_id)
        .bind(day)
        .bind(time)
        .execute(db)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}

impl DaySlot {
    /// The plan's assignments for one weekday, joined with their meals.
    /// At most one row per meal time, enforced by the unique index.
    pub async fn for_plan_day(
        db: &PgPool,
        plan_id: Uuid,
        day: DayOfWeek,
    ) -> anyhow::Result<Vec<DaySlot>> {
        let rows = sqlx::query_as::<_, DaySlot>(
            r#"
            SELECT s.meal_time, s.meal_id, m.name AS meal_name,
                   m.description AS meal_description
            FROM meal_plan_slots s
            JOIN meals m ON m.id = s.meal_id
            WHERE s.plan_id = $1 AND s.day_of_week = $2
            "#,
        )
        .bind(plan_id)
        .bind(day)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
