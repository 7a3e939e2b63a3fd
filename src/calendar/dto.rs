use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::plans::repo::DaySlot;
use crate::schedule::{DayOfWeek, MealTime};
use crate::tasks::dto::TaskResponse;

/// Meal shown in one slot of the resolved day.
#[derive(Debug, Clone, Serialize)]
pub struct SlotMeal {
    pub meal_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<DaySlot> for SlotMeal {
    fn from(s: DaySlot) -> Self {
        Self {
            meal_id: s.meal_id,
            name: s.meal_name,
            description: s.meal_description,
        }
    }
}

/// The four fixed meal times of a day; unassigned slots stay null.
#[derive(Debug, Default, Serialize)]
pub struct MealsByTime {
    pub breakfast: Option<SlotMeal>,
    pub lunch: Option<SlotMeal>,
    pub dinner: Option<SlotMeal>,
    pub snack: Option<SlotMeal>,
}

impl MealsByTime {
    /// Folds a day's slot rows into the fixed meal-time fields. The store
    /// guarantees at most one row per meal time.
    pub fn from_slots(slots: Vec<DaySlot>) -> Self {
        let mut by_time = MealsByTime::default();
        for slot in slots {
            let time = slot.meal_time;
            let meal = SlotMeal::from(slot);
            match time {
                MealTime::Breakfast => by_time.breakfast = Some(meal),
                MealTime::Lunch => by_time.lunch = Some(meal),
                MealTime::Dinner => by_time.dinner = Some(meal),
                MealTime::Snack => by_time.snack = Some(meal),
            }
        }
        by_time
    }
}

#[derive(Debug, Serialize)]
pub struct ActivePlanSummary {
    pub id: Uuid,
    pub name: String,
}

/// Response of GET /calendar/:date.
#[derive(Debug, Serialize)]
pub struct DayResolution {
    pub date: Date,
    pub day_of_week: DayOfWeek,
    pub plan: Option<ActivePlanSummary>,
    pub meals_by_time: MealsByTime,
    pub tasks_due: Vec<TaskResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_slot(time: MealTime, name: &str) -> DaySlot {
        DaySlot {
            meal_time: time,
            meal_id: Uuid::new_v4(),
            meal_name: name.to_string(),
            meal_description: None,
        }
    }

    #[test]
    fn folds_slots_into_their_meal_times() {
        let by_time = MealsByTime::from_slots(vec![
            day_slot(MealTime::Breakfast, "oatmeal"),
            day_slot(MealTime::Dinner, "stew"),
        ]);
        assert_eq!(by_time.breakfast.as_ref().map(|m| m.name.as_str()), Some("oatmeal"));
        assert!(by_time.lunch.is_none());
        assert_eq!(by_time.dinner.as_ref().map(|m| m.name.as_str()), Some("stew"));
        assert!(by_time.snack.is_none());
    }

    #[test]
    fn empty_day_keeps_all_four_entries_null() {
        let by_time = MealsByTime::from_slots(Vec::new());
        let json = serde_json::to_value(&by_time).unwrap();
        for key in ["breakfast", "lunch", "dinner", "snack"] {
            assert!(json[key].is_null(), "{key} should be null");
        }
    }
}
