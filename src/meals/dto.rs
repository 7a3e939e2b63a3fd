use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::meals::repo::{Meal, MealNutrition, NutritionValues};

#[derive(Debug, Deserialize)]
pub struct NutritionInput {
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl From<NutritionInput> for NutritionValues {
    fn from(n: NutritionInput) -> Self {
        Self {
            calories_kcal: n.calories_kcal,
            protein_g: n.protein_g,
            carbs_g: n.carbs_g,
            fat_g: n.fat_g,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    pub description: Option<String>,
    pub nutrition: Option<NutritionInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub name: String,
    pub description: Option<String>,
    pub nutrition: Option<NutritionInput>,
}

#[derive(Debug, Serialize)]
pub struct NutritionResponse {
    pub calories_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
}

impl From<MealNutrition> for NutritionResponse {
    fn from(n: MealNutrition) -> Self {
        Self {
            calories_kcal: n.calories_kcal,
            protein_g: n.protein_g,
            carbs_g: n.carbs_g,
            fat_g: n.fat_g,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub nutrition: Option<NutritionResponse>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl MealResponse {
    pub fn from_parts(meal: Meal, nutrition: Option<MealNutrition>) -> Self {
        Self {
            id: meal.id,
            name: meal.name,
            description: meal.description,
            nutrition: nutrition.map(NutritionResponse::from),
            created_at: meal.created_at,
            updated_at: meal.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealListItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}
