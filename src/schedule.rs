use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::Date;

use crate::error::ApiError;

/// Day-of-week vocabulary for slot scheduling. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Fixed iteration order for the repeat-for-all-days directive.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<time::Weekday> for DayOfWeek {
    fn from(w: time::Weekday) -> Self {
        match w {
            time::Weekday::Monday => DayOfWeek::Monday,
            time::Weekday::Tuesday => DayOfWeek::Tuesday,
            time::Weekday::Wednesday => DayOfWeek::Wednesday,
            time::Weekday::Thursday => DayOfWeek::Thursday,
            time::Weekday::Friday => DayOfWeek::Friday,
            time::Weekday::Saturday => DayOfWeek::Saturday,
            time::Weekday::Sunday => DayOfWeek::Sunday,
        }
    }
}

/// The four fixed meal times of a plan day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
            MealTime::Snack => "snack",
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date as plain civil components.
///
/// Never goes through a timestamp or the local timezone; the derived weekday
/// must be the same no matter where the process runs.
pub fn parse_calendar_date(raw: &str) -> Result<Date, ApiError> {
    let fmt = format_description!("[year]-[month]-[day]");
    Date::parse(raw, fmt)
        .map_err(|_| ApiError::Validation(format!("invalid calendar date: {raw}")))
}

/// Weekday of a civil date (proleptic Gregorian).
pub fn day_of_week(date: Date) -> DayOfWeek {
    DayOfWeek::from(date.weekday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_weekday_without_timezone_drift() {
        // A prior client defect shifted this date a day depending on locale.
        let date = parse_calendar_date("2024-03-01").expect("valid date");
        assert_eq!(day_of_week(date), DayOfWeek::Friday);
    }

    #[test]
    fn derives_weekday_across_month_and_year_boundaries() {
        let new_year = parse_calendar_date("2024-01-01").expect("valid date");
        assert_eq!(day_of_week(new_year), DayOfWeek::Monday);
        let leap = parse_calendar_date("2024-02-29").expect("valid date");
        assert_eq!(day_of_week(leap), DayOfWeek::Thursday);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_calendar_date("2024-3-1").is_err());
        assert!(parse_calendar_date("2024-13-01").is_err());
        assert!(parse_calendar_date("not-a-date").is_err());
        assert!(parse_calendar_date("2023-02-29").is_err());
    }

    #[test]
    fn all_days_iterate_monday_through_sunday() {
        assert_eq!(DayOfWeek::ALL.len(), 7);
        assert_eq!(DayOfWeek::ALL[0], DayOfWeek::Monday);
        assert_eq!(DayOfWeek::ALL[6], DayOfWeek::Sunday);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&DayOfWeek::Wednesday).unwrap(), "\"wednesday\"");
        assert_eq!(serde_json::to_string(&MealTime::Snack).unwrap(), "\"snack\"");
        let day: DayOfWeek = serde_json::from_str("\"sunday\"").unwrap();
        assert_eq!(day, DayOfWeek::Sunday);
        assert!(serde_json::from_str::<MealTime>("\"brunch\"").is_err());
    }
}
