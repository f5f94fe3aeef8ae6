//! Elapsed-time arithmetic
//!
//! Resolves how much of the lifespan has already been lived. A fully
//! specified birth date gives an exact count of whole weeks; otherwise the
//! coarser `current_age * 52` estimate is used.

use chrono::{DateTime, Utc};

use crate::types::{BirthDate, LifeParameters, WEEKS_PER_YEAR};

/// Milliseconds in one week
pub const MILLIS_PER_WEEK: i64 = 7 * 24 * 60 * 60 * 1000;

/// Milliseconds in one average Julian year (365.25 days)
pub const MILLIS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Whole weeks between birth (midnight UTC) and `now`, floored.
///
/// Returns `None` when the birth date is incomplete or not a real date.
/// A birth date in the future yields a negative count.
pub fn weeks_since_birth(birth_date: &BirthDate, now: DateTime<Utc>) -> Option<i64> {
    let born = birth_date.to_instant()?;
    let millis = (now - born).num_milliseconds();
    Some(millis.div_euclid(MILLIS_PER_WEEK))
}

/// Age in whole years at `now`, counting 365.25 days per year.
///
/// Never negative; a birth date in the future gives an age of zero.
pub fn age_at(birth_date: &BirthDate, now: DateTime<Utc>) -> Option<u32> {
    let born = birth_date.to_instant()?;
    let years = ((now - born).num_milliseconds() as f64 / MILLIS_PER_YEAR).floor();
    Some(years.clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Number of weeks lived at `now`.
///
/// Uses the birth date when it is fully specified, else `current_age * 52`.
pub fn lived_weeks(params: &LifeParameters, now: DateTime<Utc>) -> i64 {
    match weeks_since_birth(&params.birth_date, now) {
        Some(weeks) => weeks,
        None => {
            tracing::debug!(
                birth_date = ?params.birth_date,
                current_age = params.current_age,
                "{}",
                fallback_reason(&params.birth_date)
            );
            i64::from(params.current_age) * WEEKS_PER_YEAR as i64
        }
    }
}

/// Why a birth date cannot give the lived weeks
fn fallback_reason(birth_date: &BirthDate) -> &'static str {
    if birth_date.is_complete() {
        "birth date is not a calendar date; using current age"
    } else if birth_date.day.is_some() || birth_date.month.is_some() || birth_date.year.is_some() {
        "birth date is incomplete; using current age"
    } else {
        "no birth date; using current age"
    }
}

/// Index of the present week in the grid, known only from a birth date
pub fn current_week(params: &LifeParameters, now: DateTime<Utc>) -> Option<i64> {
    weeks_since_birth(&params.birth_date, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_weeks_since_birth_floors() {
        let birth = BirthDate::new(1, 1, 2000);

        assert_eq!(weeks_since_birth(&birth, at(2000, 1, 1)), Some(0));
        assert_eq!(weeks_since_birth(&birth, at(2000, 1, 7)), Some(0));
        assert_eq!(weeks_since_birth(&birth, at(2000, 1, 8)), Some(1));
        assert_eq!(weeks_since_birth(&birth, at(2000, 1, 14)), Some(1));
    }

    #[test]
    fn test_day_within_same_week_keeps_count() {
        let birth = BirthDate::new(10, 3, 1985);
        let start_of_week = at(2024, 5, 1);
        let base = weeks_since_birth(&birth, start_of_week).unwrap();

        // find the first moment of the current week bucket
        let born = birth.to_instant().unwrap();
        let offset = (start_of_week - born).num_milliseconds().rem_euclid(MILLIS_PER_WEEK);
        let bucket_start = start_of_week - Duration::milliseconds(offset);

        for day in 0..7 {
            let now = bucket_start + Duration::days(day);
            assert_eq!(weeks_since_birth(&birth, now), Some(base));
        }
        let next = bucket_start + Duration::days(7);
        assert_eq!(weeks_since_birth(&birth, next), Some(base + 1));
    }

    #[test]
    fn test_future_birth_date_is_negative() {
        let birth = BirthDate::new(1, 1, 2030);
        assert_eq!(weeks_since_birth(&birth, at(2029, 12, 31)), Some(-1));
        assert_eq!(age_at(&birth, at(2029, 12, 31)), Some(0));
    }

    #[test]
    fn test_incomplete_birth_date_is_none() {
        let birth = BirthDate {
            day: None,
            month: Some(4),
            year: Some(1992),
        };
        assert_eq!(weeks_since_birth(&birth, at(2024, 1, 1)), None);
        assert_eq!(age_at(&birth, at(2024, 1, 1)), None);
    }

    #[test]
    fn test_age_at() {
        let birth = BirthDate::new(15, 6, 1990);
        assert_eq!(age_at(&birth, at(2024, 6, 14)), Some(33));
        assert_eq!(age_at(&birth, at(2024, 6, 16)), Some(34));
    }

    #[test]
    fn test_lived_weeks_fallback() {
        let mut params = LifeParameters::new("Sam", 40, 85);
        assert_eq!(lived_weeks(&params, at(2024, 1, 1)), 40 * 52);
        assert_eq!(current_week(&params, at(2024, 1, 1)), None);

        params.birth_date = BirthDate::new(31, 2, 1984);
        assert_eq!(lived_weeks(&params, at(2024, 1, 1)), 40 * 52);

        params.birth_date = BirthDate::new(1, 1, 2000);
        assert_eq!(lived_weeks(&params, at(2000, 3, 4)), 9);
        assert_eq!(current_week(&params, at(2000, 3, 4)), Some(9));
    }

    #[test]
    fn test_partial_birth_date_falls_back() {
        let mut params = LifeParameters::new("Sam", 40, 85);
        params.birth_date = BirthDate {
            day: None,
            month: Some(6),
            year: Some(1984),
        };
        assert_eq!(lived_weeks(&params, at(2024, 1, 1)), 40 * 52);
        assert_eq!(
            fallback_reason(&params.birth_date),
            "birth date is incomplete; using current age"
        );
    }

    #[test]
    fn test_fallback_reasons() {
        assert_eq!(
            fallback_reason(&BirthDate::default()),
            "no birth date; using current age"
        );
        assert_eq!(
            fallback_reason(&BirthDate::new(31, 2, 1984)),
            "birth date is not a calendar date; using current age"
        );
    }
}
