//! Core types for the life grid
//!
//! This module defines the data structures that flow through the grid
//! computation: life parameters in, week grid, statistics, brackets and the
//! serialized report out.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Number of week cells in one grid row (one modeled year)
pub const WEEKS_PER_YEAR: usize = 52;

/// Longest lifespan the grid models, in years
pub const MAX_LIFE_EXPECTANCY: u32 = 150;

/// Semantic label of a single week cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sleep,
    Study,
    Work,
    Retirement,
    Leisure,
    Sports,
    Family,
    Travel,
    Future,
    Lived,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 10] = [
        Category::Sleep,
        Category::Study,
        Category::Work,
        Category::Retirement,
        Category::Leisure,
        Category::Sports,
        Category::Family,
        Category::Travel,
        Category::Future,
        Category::Lived,
    ];

    /// Priority order used to fill the grid in normal mode.
    ///
    /// Changing this order changes which categories are truncated first when
    /// the lifespan is too short to hold every run.
    pub const FILL_ORDER: [Category; 8] = [
        Category::Sleep,
        Category::Study,
        Category::Work,
        Category::Retirement,
        Category::Leisure,
        Category::Sports,
        Category::Family,
        Category::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sleep => "sleep",
            Category::Study => "study",
            Category::Work => "work",
            Category::Retirement => "retirement",
            Category::Leisure => "leisure",
            Category::Sports => "sports",
            Category::Family => "family",
            Category::Travel => "travel",
            Category::Future => "future",
            Category::Lived => "lived",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which view of the grid is being computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Categories laid out as contiguous blocks
    #[default]
    Normal,
    /// Elapsed weeks versus remaining weeks only
    #[serde(alias = "life")]
    LivedToDate,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Normal => "normal",
            DisplayMode::LivedToDate => "lived-to-date",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(DisplayMode::Normal),
            "lived-to-date" | "lived_to_date" | "lived" | "life" => Ok(DisplayMode::LivedToDate),
            other => Err(GridError::InvalidInput(format!("unknown display mode: {other}"))),
        }
    }
}

/// Birth date as collected by the questionnaire; any component may be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BirthDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl BirthDate {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self {
            day: Some(day),
            month: Some(month),
            year: Some(year),
        }
    }

    /// True when day, month and year are all present
    pub fn is_complete(&self) -> bool {
        self.day.is_some() && self.month.is_some() && self.year.is_some()
    }

    /// Calendar date, if complete and valid
    pub fn to_date(&self) -> Option<NaiveDate> {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        }
    }

    /// Midnight UTC of the birth date
    pub fn to_instant(&self) -> Option<chrono::DateTime<Utc>> {
        self.to_date()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

/// Biographical and time-allocation facts for one person.
///
/// Produced by the questionnaire layer after validation. Hour fields are
/// fractional; age and year fields are whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeParameters {
    /// Display-only name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: BirthDate,
    /// Age in years, used when the birth date is not fully specified
    pub current_age: u32,
    /// Total modeled lifespan in years
    pub life_expectancy: u32,
    /// Hours of sleep per night
    pub sleep_hours: f64,
    pub study_start_age: u32,
    pub study_end_age: u32,
    pub study_hours_per_week: f64,
    pub work_start_age: u32,
    pub work_end_age: u32,
    pub work_hours_per_week: f64,
    pub leisure_hours_per_week: f64,
    pub sports_hours_per_week: f64,
    pub family_hours_per_week: f64,
    pub travel_weeks_per_year: u32,
}

impl LifeParameters {
    /// Parameters with the questionnaire's suggested answers for every
    /// time-allocation question.
    pub fn new(name: impl Into<String>, current_age: u32, life_expectancy: u32) -> Self {
        Self {
            name: name.into(),
            birth_date: BirthDate::default(),
            current_age,
            life_expectancy,
            sleep_hours: 8.0,
            study_start_age: 5,
            study_end_age: 22,
            study_hours_per_week: 35.0,
            work_start_age: 22,
            work_end_age: 65,
            work_hours_per_week: 40.0,
            leisure_hours_per_week: 20.0,
            sports_hours_per_week: 3.0,
            family_hours_per_week: 10.0,
            travel_weeks_per_year: 2,
        }
    }

    /// Total number of week cells in the modeled lifespan.
    ///
    /// Capped at `MAX_LIFE_EXPECTANCY` rows.
    pub fn total_weeks(&self) -> usize {
        self.life_expectancy.min(MAX_LIFE_EXPECTANCY) as usize * WEEKS_PER_YEAR
    }
}

/// Row/column coordinates of a week cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub index: usize,
    /// Zero-based row (year of life)
    pub row: usize,
    /// Zero-based column (week within the year)
    pub column: usize,
}

impl CellPosition {
    pub fn from_index(index: usize) -> Self {
        Self {
            index,
            row: index / WEEKS_PER_YEAR,
            column: index % WEEKS_PER_YEAR,
        }
    }

    /// One-based year of life
    pub fn year(&self) -> usize {
        self.row + 1
    }

    /// One-based week within the year
    pub fn week(&self) -> usize {
        self.column + 1
    }
}

/// Ordered sequence of category labels, one per week of the modeled lifespan.
///
/// Index 0 is the first week of life. A grid is never mutated after it is
/// built; recompute it when the parameters or display mode change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekGrid {
    cells: Vec<Category>,
}

impl WeekGrid {
    pub fn from_cells(cells: Vec<Category>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Category] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Category> {
        self.cells.get(index).copied()
    }

    /// Number of cells carrying the given label
    pub fn count(&self, category: Category) -> usize {
        self.cells.iter().filter(|&&c| c == category).count()
    }

    /// Number of rows (years) spanned by the grid
    pub fn row_count(&self) -> usize {
        self.cells.len().div_ceil(WEEKS_PER_YEAR)
    }

    /// Iterate over rows of at most `WEEKS_PER_YEAR` cells
    pub fn rows(&self) -> impl Iterator<Item = &[Category]> {
        self.cells.chunks(WEEKS_PER_YEAR)
    }

    /// Coordinates of a cell, if the index is inside the grid
    pub fn position(&self, index: usize) -> Option<CellPosition> {
        (index < self.cells.len()).then(|| CellPosition::from_index(index))
    }
}

/// Aggregate figures for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    /// Week count; negative only for `future` when life expectancy is exceeded
    pub week_count: i64,
    /// Exact `week_count / 52`
    pub year_equivalent: f64,
    /// `week_count / total_weeks * 100`, or 0 when the lifespan is empty
    pub percentage_of_lifespan: f64,
}

/// Per-category statistics for one set of life parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_weeks: i64,
    pub lived_weeks: i64,
    /// `total_weeks - lived_weeks`, not clamped
    pub remaining_weeks: i64,
    pub categories: BTreeMap<Category, CategoryStat>,
}

impl CategoryStats {
    pub fn get(&self, category: Category) -> Option<&CategoryStat> {
        self.categories.get(&category)
    }

    /// Week count for any category, including `lived` and `future`
    pub fn weeks_for(&self, category: Category) -> i64 {
        self.get(category).map(|s| s.week_count).unwrap_or(0)
    }

    pub fn lived_percentage(&self) -> f64 {
        self.get(Category::Lived)
            .map(|s| s.percentage_of_lifespan)
            .unwrap_or(0.0)
    }
}

/// Which gutter a bracket is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketSide {
    #[default]
    Left,
    Right,
}

impl BracketSide {
    pub fn flipped(self) -> Self {
        match self {
            BracketSide::Left => BracketSide::Right,
            BracketSide::Right => BracketSide::Left,
        }
    }
}

/// Row span of a maximal run of same-category cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub category: Category,
    pub start_row: usize,
    /// Inclusive
    pub end_row: usize,
    pub side: BracketSide,
}

impl Bracket {
    /// Number of rows covered, inclusive of both ends
    pub fn row_span(&self) -> usize {
        self.end_row - self.start_row + 1
    }
}

/// "More time in `higher` than in `lower`" comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub higher: Category,
    pub lower: Category,
}

/// Everything a renderer needs for one view of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeAnalysis {
    pub mode: DisplayMode,
    pub grid: WeekGrid,
    pub stats: CategoryStats,
    /// Empty outside normal mode
    pub brackets: Vec<Bracket>,
    pub insight: Insight,
    /// Index of the present week, when the birth date is known
    pub current_week: Option<i64>,
}

// ============================================================================
// Report output
// ============================================================================

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Grid dimensions and cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub rows: usize,
    pub columns: usize,
    pub cells: WeekGrid,
}

/// Serialized report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub name: String,
    pub mode: DisplayMode,
    pub layout: GridLayout,
    pub stats: CategoryStats,
    pub brackets: Vec<Bracket>,
    pub insight: Insight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_week: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&Category::Retirement).unwrap();
        assert_eq!(json, "\"retirement\"");

        let parsed: Category = serde_json::from_str("\"lived\"").unwrap();
        assert_eq!(parsed, Category::Lived);
    }

    #[test]
    fn test_display_mode_parsing() {
        assert_eq!("normal".parse::<DisplayMode>().unwrap(), DisplayMode::Normal);
        assert_eq!(
            "Lived-To-Date".parse::<DisplayMode>().unwrap(),
            DisplayMode::LivedToDate
        );
        assert_eq!("life".parse::<DisplayMode>().unwrap(), DisplayMode::LivedToDate);
        assert!("sideways".parse::<DisplayMode>().is_err());

        let parsed: DisplayMode = serde_json::from_str("\"lived-to-date\"").unwrap();
        assert_eq!(parsed, DisplayMode::LivedToDate);
    }

    #[test]
    fn test_birth_date_completeness() {
        let partial = BirthDate {
            day: Some(15),
            month: None,
            year: Some(1990),
        };
        assert!(!partial.is_complete());
        assert!(partial.to_date().is_none());

        let impossible = BirthDate::new(30, 2, 1990);
        assert!(impossible.is_complete());
        assert!(impossible.to_date().is_none());

        let valid = BirthDate::new(15, 6, 1990);
        assert_eq!(valid.to_date(), NaiveDate::from_ymd_opt(1990, 6, 15));
        assert_eq!(
            valid.to_instant().unwrap().to_rfc3339(),
            "1990-06-15T00:00:00+00:00"
        );
    }

    #[test]
    fn test_total_weeks_is_capped() {
        assert_eq!(LifeParameters::new("Sam", 30, 80).total_weeks(), 80 * 52);
        assert_eq!(
            LifeParameters::new("Sam", 30, MAX_LIFE_EXPECTANCY).total_weeks(),
            150 * 52
        );
        assert_eq!(
            LifeParameters::new("Sam", 30, 1_000_000_000).total_weeks(),
            150 * 52
        );
    }

    #[test]
    fn test_cell_position() {
        let pos = CellPosition::from_index(105);
        assert_eq!(pos.row, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.year(), 3);
        assert_eq!(pos.week(), 2);
    }

    #[test]
    fn test_week_grid_accessors() {
        let mut cells = vec![Category::Sleep; 60];
        cells.extend(vec![Category::Future; 44]);
        let grid = WeekGrid::from_cells(cells);

        assert_eq!(grid.len(), 104);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.count(Category::Sleep), 60);
        assert_eq!(grid.get(59), Some(Category::Sleep));
        assert_eq!(grid.get(60), Some(Category::Future));
        assert!(grid.position(104).is_none());
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_bracket_side_flip() {
        assert_eq!(BracketSide::Left.flipped(), BracketSide::Right);
        assert_eq!(BracketSide::Right.flipped(), BracketSide::Left);
    }
}
