//! Pipeline orchestration
//!
//! This module provides the public API for the life grid. It orchestrates
//! the full path from questionnaire JSON to a report document.

use chrono::{DateTime, Utc};

use crate::allocation::{allocate_at, WeekCounts};
use crate::brackets::group_brackets;
use crate::elapsed::{current_week, lived_weeks};
use crate::encoder::ReportEncoder;
use crate::error::GridError;
use crate::schema::{InputAdapter, RawLifeInput};
use crate::stats::{aggregate_counts, rank_insight};
use crate::types::{DisplayMode, LifeAnalysis, LifeParameters, LifeReport};

/// Compute every derived structure for one view of the grid.
///
/// `now` is read by the caller once and used for every time-dependent
/// figure so the grid and statistics agree.
///
/// Stages:
/// 1. WeekCounts - per-category week totals
/// 2. Allocator - week grid for the requested mode
/// 3. Aggregator - statistics and insight
/// 4. Bracket grouper - annotation brackets (normal mode only)
pub fn analyze(params: &LifeParameters, mode: DisplayMode, now: DateTime<Utc>) -> LifeAnalysis {
    let counts = WeekCounts::from_parameters(params);
    let lived = lived_weeks(params, now);

    let grid = allocate_at(params, mode, now);
    let stats = aggregate_counts(&counts, params.total_weeks(), lived);
    let insight = rank_insight(&stats);

    let brackets = match mode {
        DisplayMode::Normal => group_brackets(&grid),
        DisplayMode::LivedToDate => Vec::new(),
    };

    LifeAnalysis {
        mode,
        grid,
        stats,
        brackets,
        insight,
        current_week: current_week(params, now),
    }
}

/// Convert questionnaire JSON to a report JSON document (stateless, one-shot).
///
/// Unanswered time-allocation questions take the questionnaire's suggested
/// answers.
///
/// # Example
/// ```ignore
/// let report_json = life_grid_report(input_json, DisplayMode::Normal)?;
/// ```
pub fn life_grid_report(input_json: String, mode: DisplayMode) -> Result<String, GridError> {
    LifeGridProcessor::new().process(&input_json, mode)
}

/// Stateful processor that keeps one producer identity across reports.
///
/// A processor can be pinned to a reference time so repeated reports are
/// reproducible.
pub struct LifeGridProcessor {
    encoder: ReportEncoder,
    reference_time: Option<DateTime<Utc>>,
}

impl Default for LifeGridProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl LifeGridProcessor {
    /// Create a processor that reads the clock on every call
    pub fn new() -> Self {
        Self {
            encoder: ReportEncoder::new(),
            reference_time: None,
        }
    }

    /// Create a processor pinned to a fixed reference time
    pub fn at(reference_time: DateTime<Utc>) -> Self {
        Self {
            encoder: ReportEncoder::new(),
            reference_time: Some(reference_time),
        }
    }

    /// Use a specific encoder (e.g. with a known instance ID)
    pub fn with_encoder(mut self, encoder: ReportEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.reference_time.unwrap_or_else(Utc::now)
    }

    /// Analyze validated parameters
    pub fn analyze(&self, params: &LifeParameters, mode: DisplayMode) -> LifeAnalysis {
        analyze(params, mode, self.now())
    }

    /// Build the report document for validated parameters
    pub fn report(&self, params: &LifeParameters, mode: DisplayMode) -> LifeReport {
        let now = self.now();
        let analysis = analyze(params, mode, now);
        self.encoder.encode(&params.name, analysis, now)
    }

    /// Convert raw questionnaire input to parameters, applying suggested
    /// answers for unanswered questions
    pub fn parameters(&self, input: RawLifeInput) -> Result<LifeParameters, GridError> {
        let input = input.with_defaults(RawLifeInput::questionnaire_defaults());
        InputAdapter::to_parameters(&input, self.now())
    }

    /// Process questionnaire JSON into report JSON
    pub fn process(&self, input_json: &str, mode: DisplayMode) -> Result<String, GridError> {
        let now = self.now();
        let input = InputAdapter::parse_json(input_json)?
            .with_defaults(RawLifeInput::questionnaire_defaults());
        let params = InputAdapter::to_parameters(&input, now)?;

        let analysis = analyze(&params, mode, now);
        tracing::debug!(
            mode = mode.as_str(),
            cells = analysis.grid.len(),
            brackets = analysis.brackets.len(),
            "grid analyzed"
        );

        self.encoder.encode_to_json(&params.name, analysis, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BracketSide, Category};
    use chrono::TimeZone;

    fn reference_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    fn sample_input_json() -> &'static str {
        r#"{
            "name": "Marie",
            "birth_day": 15,
            "birth_month": 6,
            "birth_year": 1990,
            "life_expectancy": 80
        }"#
    }

    #[test]
    fn test_analyze_normal_mode() {
        let params = LifeParameters::new("Marie", 34, 80);
        let analysis = analyze(&params, DisplayMode::Normal, reference_time());

        assert_eq!(analysis.grid.len(), 4160);
        assert_eq!(analysis.brackets.len(), 8);
        assert_eq!(analysis.brackets[0].category, Category::Sleep);
        assert_eq!(analysis.brackets[0].side, BracketSide::Left);
        assert_eq!(analysis.stats.lived_weeks, 34 * 52);
        assert_eq!(analysis.insight.higher, Category::Sleep);
    }

    #[test]
    fn test_analyze_lived_mode_keeps_stats() {
        let params = LifeParameters::new("Marie", 34, 80);
        let analysis = analyze(&params, DisplayMode::LivedToDate, reference_time());

        assert!(analysis.brackets.is_empty());
        assert_eq!(analysis.grid.count(Category::Lived), 34 * 52);
        // statistics are still the normal-mode breakdown
        assert_eq!(analysis.stats.weeks_for(Category::Sleep), 1387);
    }

    #[test]
    fn test_life_grid_report_one_shot() {
        let json = life_grid_report(sample_input_json().to_string(), DisplayMode::Normal).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["producer"]["name"], "life-grid");
        assert_eq!(payload["layout"]["rows"], 80);
        assert!(payload["current_week"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_processor_pinned_time_is_reproducible() {
        let processor = LifeGridProcessor::at(reference_time());

        let first = processor
            .process(sample_input_json(), DisplayMode::LivedToDate)
            .unwrap();
        let second = processor
            .process(sample_input_json(), DisplayMode::LivedToDate)
            .unwrap();
        assert_eq!(first, second);

        let payload: serde_json::Value = serde_json::from_str(&first).unwrap();
        // 1990-06-15 to 2024-09-01 is 12497 days
        assert_eq!(payload["current_week"], 1785);
        assert_eq!(payload["stats"]["lived_weeks"], 1785);
    }

    #[test]
    fn test_processor_parameters_fill_defaults() {
        let processor = LifeGridProcessor::at(reference_time());
        let input = RawLifeInput {
            name: Some("Sam".to_string()),
            current_age: Some(40.0),
            life_expectancy: Some(85.0),
            ..Default::default()
        };

        let params = processor.parameters(input).unwrap();
        assert_eq!(params, LifeParameters::new("Sam", 40, 85));
    }

    #[test]
    fn test_invalid_json() {
        let result = life_grid_report("not valid json".to_string(), DisplayMode::Normal);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_life_expectancy() {
        let result = life_grid_report(r#"{"current_age": 30}"#.to_string(), DisplayMode::Normal);
        assert!(matches!(result, Err(GridError::InvalidInput(_))));
    }
}
