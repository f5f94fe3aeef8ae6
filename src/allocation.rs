//! Week allocation
//!
//! Turns life parameters into an ordered sequence of week labels. In normal
//! mode each activity gets a contiguous block, written in a fixed priority
//! order; in lived-to-date mode the grid only separates elapsed weeks from
//! the rest.
//!
//! The blocks linearize overlapping activities for display. Two adjacent
//! blocks say nothing about when those activities happen in real life.

use chrono::{DateTime, Utc};

use crate::elapsed::lived_weeks;
use crate::types::{Category, DisplayMode, LifeParameters, WeekGrid, WEEKS_PER_YEAR};

/// Hours in one calendar week
pub const HOURS_PER_WEEK: f64 = 24.0 * 7.0;

/// Whole-week totals per activity, before any truncation at the grid edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekCounts {
    pub sleep: usize,
    pub study: usize,
    pub work: usize,
    pub retirement: usize,
    pub leisure: usize,
    pub sports: usize,
    pub family: usize,
    pub travel: usize,
}

impl WeekCounts {
    /// Compute every activity's week count.
    ///
    /// Rates are rounded to the nearest week; retirement and travel are
    /// whole-number products and are taken as is. Negative or non-finite
    /// results become zero.
    pub fn from_parameters(params: &LifeParameters) -> Self {
        let total_weeks = params.total_weeks() as f64;
        let weeks_per_year = WEEKS_PER_YEAR as f64;

        let study_years = f64::from(params.study_end_age) - f64::from(params.study_start_age);
        let work_years = f64::from(params.work_end_age) - f64::from(params.work_start_age);

        let retirement_years =
            i64::from(params.life_expectancy) - i64::from(params.work_end_age);

        Self {
            sleep: rounded_weeks(params.sleep_hours / 24.0 * total_weeks),
            study: rounded_weeks(
                study_years * weeks_per_year * params.study_hours_per_week / HOURS_PER_WEEK,
            ),
            work: rounded_weeks(
                work_years * weeks_per_year * params.work_hours_per_week / HOURS_PER_WEEK,
            ),
            retirement: clamp_weeks(retirement_years.saturating_mul(WEEKS_PER_YEAR as i64)),
            leisure: rounded_weeks(params.leisure_hours_per_week / HOURS_PER_WEEK * total_weeks),
            sports: rounded_weeks(params.sports_hours_per_week / HOURS_PER_WEEK * total_weeks),
            family: rounded_weeks(params.family_hours_per_week / HOURS_PER_WEEK * total_weeks),
            travel: (params.travel_weeks_per_year as usize)
                .saturating_mul(params.life_expectancy as usize),
        }
    }

    /// Week count for an activity; `future` and `lived` have none
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Sleep => self.sleep,
            Category::Study => self.study,
            Category::Work => self.work,
            Category::Retirement => self.retirement,
            Category::Leisure => self.leisure,
            Category::Sports => self.sports,
            Category::Family => self.family,
            Category::Travel => self.travel,
            Category::Future | Category::Lived => 0,
        }
    }

    /// Activities paired with their counts, in grid fill order
    pub fn in_fill_order(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::FILL_ORDER.iter().map(move |&c| (c, self.get(c)))
    }

    /// Sum of all activity counts (may exceed the grid size)
    pub fn total(&self) -> usize {
        self.in_fill_order()
            .fold(0usize, |acc, (_, weeks)| acc.saturating_add(weeks))
    }
}

/// Allocate the grid for the given mode, reading the clock once.
pub fn allocate(params: &LifeParameters, mode: DisplayMode) -> WeekGrid {
    allocate_at(params, mode, Utc::now())
}

/// Allocate the grid for the given mode against a fixed reference time.
///
/// `now` is only consulted in lived-to-date mode.
pub fn allocate_at(params: &LifeParameters, mode: DisplayMode, now: DateTime<Utc>) -> WeekGrid {
    match mode {
        DisplayMode::Normal => allocate_categories(params),
        DisplayMode::LivedToDate => allocate_lived(params.total_weeks(), lived_weeks(params, now)),
    }
}

/// Fill the grid with activity blocks in priority order.
///
/// Each block starts at the first unfilled cell. A block that would run past
/// the last cell is cut short; cells no block reaches stay `future`.
pub fn allocate_categories(params: &LifeParameters) -> WeekGrid {
    let total_cells = params.total_weeks();
    let counts = WeekCounts::from_parameters(params);

    let mut cells = vec![Category::Future; total_cells];
    let mut cursor = 0usize;

    for (category, weeks) in counts.in_fill_order() {
        let end = cursor.saturating_add(weeks).min(total_cells);
        if end - cursor < weeks {
            tracing::debug!(
                category = category.as_str(),
                requested = weeks,
                written = end - cursor,
                "category run truncated at grid boundary"
            );
        }
        cells[cursor..end].fill(category);
        cursor = end;
    }

    if total_cells == 0 {
        tracing::debug!("life expectancy is zero; grid is empty");
    }

    WeekGrid::from_cells(cells)
}

/// Mark the first `lived_weeks` cells as lived and the rest as future.
pub fn allocate_lived(total_cells: usize, lived_weeks: i64) -> WeekGrid {
    let lived = usize::try_from(lived_weeks.max(0))
        .unwrap_or(usize::MAX)
        .min(total_cells);

    let mut cells = vec![Category::Future; total_cells];
    cells[..lived].fill(Category::Lived);
    WeekGrid::from_cells(cells)
}

fn rounded_weeks(value: f64) -> usize {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates for values past usize::MAX
    value.round() as usize
}

fn clamp_weeks(value: i64) -> usize {
    usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BirthDate;
    use chrono::TimeZone;

    fn sample_params() -> LifeParameters {
        LifeParameters::new("Marie", 34, 80)
    }

    #[test]
    fn test_grid_length_matches_lifespan() {
        let params = sample_params();
        let grid = allocate_categories(&params);
        assert_eq!(grid.len(), 80 * 52);
        assert_eq!(grid.len(), 4160);
    }

    #[test]
    fn test_reference_week_counts() {
        let counts = WeekCounts::from_parameters(&sample_params());

        // round(8 / 24 * 4160) = round(1386.67)
        assert_eq!(counts.sleep, 1387);
        // round(43 * 52 * 40 / 168) = round(532.38)
        assert_eq!(counts.work, 532);
        // round(17 * 52 * 35 / 168) = round(184.17)
        assert_eq!(counts.study, 184);
        // (80 - 65) * 52
        assert_eq!(counts.retirement, 780);
        // round(20 / 168 * 4160) = round(495.24)
        assert_eq!(counts.leisure, 495);
        // round(3 / 168 * 4160) = round(74.29)
        assert_eq!(counts.sports, 74);
        // round(10 / 168 * 4160) = round(247.62)
        assert_eq!(counts.family, 248);
        assert_eq!(counts.travel, 160);
    }

    #[test]
    fn test_blocks_written_in_priority_order() {
        let params = sample_params();
        let counts = WeekCounts::from_parameters(&params);
        let grid = allocate_categories(&params);

        let mut cursor = 0;
        for (category, weeks) in counts.in_fill_order() {
            assert!(grid.cells()[cursor..cursor + weeks]
                .iter()
                .all(|&c| c == category));
            cursor += weeks;
        }
        assert!(grid.cells()[cursor..].iter().all(|&c| c == Category::Future));
        assert_eq!(grid.count(Category::Future), 4160 - counts.total());
    }

    #[test]
    fn test_counts_plus_future_equal_total() {
        let mut params = sample_params();
        params.life_expectancy = 30;
        params.work_end_age = 30;
        let grid = allocate_categories(&params);

        let filled: usize = Category::FILL_ORDER.iter().map(|&c| grid.count(c)).sum();
        assert_eq!(filled + grid.count(Category::Future), grid.len());
    }

    #[test]
    fn test_overflow_truncates_later_categories() {
        let mut params = LifeParameters::new("Short", 5, 10);
        params.sleep_hours = 12.0;
        params.study_start_age = 0;
        params.study_end_age = 10;
        params.study_hours_per_week = 168.0;
        params.work_start_age = 10;
        params.work_end_age = 10;

        let grid = allocate_categories(&params);

        assert_eq!(grid.len(), 520);
        assert_eq!(grid.count(Category::Sleep), 260);
        // study wants 520 weeks but only 260 cells remain
        assert_eq!(grid.count(Category::Study), 260);
        assert_eq!(grid.count(Category::Leisure), 0);
        assert_eq!(grid.count(Category::Travel), 0);
        assert_eq!(grid.count(Category::Future), 0);
    }

    #[test]
    fn test_inverted_ranges_clamp_to_zero() {
        let mut params = sample_params();
        params.study_start_age = 22;
        params.study_end_age = 5;
        params.work_end_age = 90;

        let counts = WeekCounts::from_parameters(&params);
        assert_eq!(counts.study, 0);
        assert_eq!(counts.retirement, 0);

        let grid = allocate_categories(&params);
        assert_eq!(grid.count(Category::Study), 0);
        assert_eq!(grid.count(Category::Retirement), 0);
    }

    #[test]
    fn test_zero_life_expectancy_yields_empty_grid() {
        let params = LifeParameters::new("Nobody", 0, 0);
        assert!(allocate_categories(&params).is_empty());

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(allocate_at(&params, DisplayMode::LivedToDate, now).is_empty());
    }

    #[test]
    fn test_implausible_life_expectancy_is_bounded() {
        let params = LifeParameters::new("Sam", 30, 1_000_000_000);
        let grid = allocate_categories(&params);
        assert_eq!(grid.len(), 150 * 52);
        assert_eq!(grid.row_count(), 150);

        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let lived = allocate_at(&params, DisplayMode::LivedToDate, now);
        assert_eq!(lived.len(), 150 * 52);
        assert_eq!(lived.count(Category::Lived), 30 * 52);
    }

    #[test]
    fn test_non_finite_hours_are_zero() {
        let mut params = sample_params();
        params.sleep_hours = f64::NAN;
        params.leisure_hours_per_week = f64::INFINITY;
        params.sports_hours_per_week = -3.0;

        let counts = WeekCounts::from_parameters(&params);
        assert_eq!(counts.sleep, 0);
        assert_eq!(counts.leisure, 0);
        assert_eq!(counts.sports, 0);
    }

    #[test]
    fn test_normal_mode_is_deterministic() {
        let params = sample_params();
        let first = allocate(&params, DisplayMode::Normal);
        let second = allocate(&params, DisplayMode::Normal);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lived_mode_uses_current_age_without_birth_date() {
        let params = sample_params();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let grid = allocate_at(&params, DisplayMode::LivedToDate, now);

        assert_eq!(grid.count(Category::Lived), 34 * 52);
        assert_eq!(grid.count(Category::Future), 4160 - 34 * 52);
        assert!(grid.cells()[..34 * 52].iter().all(|&c| c == Category::Lived));
    }

    #[test]
    fn test_lived_mode_uses_birth_date_when_complete() {
        let mut params = sample_params();
        params.birth_date = BirthDate::new(1, 1, 2000);
        // 2000-01-01 + 1000 weeks = 2019-03-02
        let now = Utc.with_ymd_and_hms(2019, 3, 4, 0, 0, 0).unwrap();

        let grid = allocate_at(&params, DisplayMode::LivedToDate, now);
        assert_eq!(grid.count(Category::Lived), 1000);
    }

    #[test]
    fn test_lived_weeks_past_lifespan_fill_grid() {
        let grid = allocate_lived(104, 500);
        assert_eq!(grid.count(Category::Lived), 104);

        let grid = allocate_lived(104, -3);
        assert_eq!(grid.count(Category::Lived), 0);
    }
}
