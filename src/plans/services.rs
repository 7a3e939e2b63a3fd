use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::meals::repo::Meal;
use crate::plans::dto::{AssignSlotRequest, AssignmentFailure, AssignmentReport, SlotResponse};
use crate::plans::repo::{MealPlan, Slot};
use crate::schedule::{DayOfWeek, MealTime};

/// Expands an assignment request into its target (day, time) pairs.
///
/// The repeat directive is the fixed seven-day set in Monday→Sunday order;
/// a single assignment needs an explicit day.
pub fn expand_selection(
    day: Option<DayOfWeek>,
    repeat: bool,
    time: MealTime,
) -> Result<Vec<(DayOfWeek, MealTime)>, ApiError> {
    if repeat {
        return Ok(DayOfWeek::ALL.iter().map(|&d| (d, time)).collect());
    }
    match day {
        Some(d) => Ok(vec![(d, time)]),
        None => Err(ApiError::Validation(
            "Either day or repeat=true is required".into(),
        )),
    }
}

/// Assigns a meal to one slot or, for the repeat directive, to the same time
/// slot on all seven days.
///
/// Each upsert commits independently; the batch is not transactional. A
/// mid-batch failure leaves earlier assignments in place and shows up in the
/// report's failure list instead of rolling anything back.
pub async fn assign_meal(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    req: &AssignSlotRequest,
) -> Result<AssignmentReport, ApiError> {
    // Ownership first; no mutation happens for a foreign or missing plan.
    let plan = MealPlan::find_owned(db, user_id, plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal plan not found".into()))?;

    if Meal::find_owned(db, user_id, req.meal_id).await?.is_none() {
        return Err(ApiError::Validation("Meal does not exist".into()));
    }

    let targets = expand_selection(req.day, req.repeat, req.time)?;

    if !req.repeat {
        // Single assignment: errors are terminal, no partial report to build.
        let (day, time) = targets[0];
        let slot = Slot::upsert(db, plan.id, req.meal_id, day, time).await?;
        info!(plan_id = %plan.id, meal_id = %req.meal_id, day = day.as_str(),
              time = time.as_str(), "slot assigned");
        return Ok(report_from(vec![(day, time, Ok(slot))]));
    }

    let mut results = Vec::with_capacity(targets.len());
    for (day, time) in targets {
        let outcome = Slot::upsert(db, plan.id, req.meal_id, day, time)
            .await
            .map_err(|e| e.to_string());
        if let Err(err) = &outcome {
            warn!(plan_id = %plan.id, day = day.as_str(), time = time.as_str(),
                  error = %err, "slot upsert failed mid-batch");
        }
        results.push((day, time, outcome));
    }

    let report = report_from(results);
    info!(plan_id = %plan.id, meal_id = %req.meal_id, time = req.time.as_str(),
          succeeded = report.succeeded, failed = report.failed, "repeat assignment done");
    Ok(report)
}

fn report_from(results: Vec<(DayOfWeek, MealTime, Result<Slot, String>)>) -> AssignmentReport {
    let requested = results.len();
    let mut slots = Vec::new();
    let mut failures = Vec::new();
    for (day, time, outcome) in results {
        match outcome {
            Ok(slot) => slots.push(SlotResponse::from(slot)),
            Err(error) => failures.push(AssignmentFailure { day, time, error }),
        }
    }
    AssignmentReport {
        requested,
        succeeded: slots.len(),
        failed: failures.len(),
        slots,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn fake_slot(day: DayOfWeek, time: MealTime) -> Slot {
        let now = OffsetDateTime::now_utc();
        Slot {
            id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            day_of_week: day,
            meal_time: time,
            meal_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn repeat_expands_to_all_seven_days_monday_first() {
        let targets = expand_selection(None, true, MealTime::Lunch).expect("expands");
        assert_eq!(targets.len(), 7);
        assert_eq!(targets[0], (DayOfWeek::Monday, MealTime::Lunch));
        assert_eq!(targets[6], (DayOfWeek::Sunday, MealTime::Lunch));
        assert!(targets.iter().all(|&(_, t)| t == MealTime::Lunch));
    }

    #[test]
    fn repeat_ignores_an_explicit_day() {
        let targets =
            expand_selection(Some(DayOfWeek::Friday), true, MealTime::Dinner).expect("expands");
        assert_eq!(targets.len(), 7);
    }

    #[test]
    fn single_selection_needs_a_day() {
        let targets =
            expand_selection(Some(DayOfWeek::Wednesday), false, MealTime::Breakfast).expect("ok");
        assert_eq!(targets, vec![(DayOfWeek::Wednesday, MealTime::Breakfast)]);

        let err = expand_selection(None, false, MealTime::Breakfast).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn report_accounts_for_every_item() {
        let results = vec![
            (DayOfWeek::Monday, MealTime::Lunch, Ok(fake_slot(DayOfWeek::Monday, MealTime::Lunch))),
            (DayOfWeek::Tuesday, MealTime::Lunch, Err("boom".to_string())),
            (DayOfWeek::Wednesday, MealTime::Lunch, Ok(fake_slot(DayOfWeek::Wednesday, MealTime::Lunch))),
        ];
        let report = report_from(results);
        assert_eq!(report.requested, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded + report.failed, report.requested);
        assert_eq!(report.failures[0].day, DayOfWeek::Tuesday);
        assert_eq!(report.failures[0].error, "boom");
    }

    #[test]
    fn all_success_report_has_no_failures() {
        let results: Vec<_> = DayOfWeek::ALL
            .iter()
            .map(|&d| (d, MealTime::Snack, Ok(fake_slot(d, MealTime::Snack))))
            .collect();
        let report = report_from(results);
        assert_eq!(report.requested, 7);
        assert_eq!(report.succeeded, 7);
        assert_eq!(report.failed, 0);
        assert!(report.failures.is_empty());
    }
}
