use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Reusable meal record; referenced, never owned, by plan slots.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Optional 1-1 nutrition record. Opaque pass-through data from the
/// nutrition-lookup collaborator; never computed or validated here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealNutrition {
    pub meal_id: Uuid,
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NutritionValues {
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl Meal {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
        nutrition: Option<NutritionValues>,
    ) -> anyhow::Result<(Meal, Option<MealNutrition>)> {
        let mut tx = db.begin().await?;

        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        let stored_nutrition = match nutrition {
            Some(n) => Some(Self::upsert_nutrition(&mut tx, meal.id, n).await?),
            None => None,
        };

        tx.commit().await?;
        Ok((meal, stored_nutrition))
    }

    async fn upsert_nutrition(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        meal_id: Uuid,
        n: NutritionValues,
    ) -> anyhow::Result<MealNutrition> {
        let row = sqlx::query_as::<_, MealNutrition>(
            r#"
            INSERT INTO meal_nutrition (meal_id, calories_kcal, protein_g, carbs_g, fat_g)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (meal_id) DO UPDATE SET
                calories_kcal = EXCLUDED.calories_kcal,
                protein_g = EXCLUDED.protein_g,
                carbs_g = EXCLUDED.carbs_g,
                fat_g = EXCLUDED.fat_g
            RETURNING meal_id, calories_kcal, protein_g, carbs_g, fat_g
            "#,
        )
        .bind(meal_id)
        .bind(n.calories_kcal)
        .bind(n.protein_g)
        .bind(n.carbs_g)
        .bind(n.fat_g)
        .fetch_one(&mut **tx)
        .await?;
        Ok(row)
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_owned(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn get_with_nutrition(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<(Meal, Option<MealNutrition>)>> {
        let Some(meal) = Self::find_owned(db, user_id, meal_id).await? else {
            return Ok(None);
        };

        let nutrition = sqlx::query_as::<_, MealNutrition>(
            r#"
            SELECT meal_id, calories_kcal, protein_g, carbs_g, fat_g
            FROM meal_nutrition
            WHERE meal_id = $1
            "#,
        )
        .bind(meal_id)
        .fetch_optional(db)
        .await?;

        Ok(Some((meal, nutrition)))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
        name: &str,
        description: Option<&str>,
        nutrition: Option<NutritionValues>,
    ) -> anyhow::Result<Option<(Meal, Option<MealNutrition>)>> {
        let mut tx = db.begin().await?;

        let meal = sqlx::query_as::<_, Meal>(
            r#"
            UPDATE meals
            SET name = $3, description = $4, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, description, created_at, updated_at
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .bind(name)
        .bind(description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(meal) = meal else {
            tx.rollback().await?;
            return Ok(None);
        };

        let stored_nutrition = match nutrition {
            Some(n) => Some(Self::upsert_nutrition(&mut tx, meal.id, n).await?),
            None => {
                sqlx::query("DELETE FROM meal_nutrition WHERE meal_id = $1")
                    .bind(meal.id)
                    .execute(&mut *tx)
                    .await?;
                None
            }
        };

        tx.commit().await?;
        Ok(Some((meal, stored_nutrition)))
    }

    /// Returns Ok(true) when deleted, Ok(false) when no owned meal matched.
    pub async fn delete(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(meal_id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
