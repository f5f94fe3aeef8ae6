//! life_grid.input.v1 schema definition
//!
//! Mirrors the questionnaire: every answer is optional on the wire so that
//! partially filled forms, profile files and environment overrides can be
//! layered before validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{BirthDate, MAX_LIFE_EXPECTANCY};

/// Current input schema name
pub const INPUT_SCHEMA_VERSION: &str = "life_grid.input.v1";

/// Largest plausible nightly sleep, in hours
pub const MAX_SLEEP_HOURS: f64 = 24.0;

/// Largest accepted life expectancy, in years
pub const MAX_LIFE_EXPECTANCY_YEARS: f64 = MAX_LIFE_EXPECTANCY as f64;

/// Largest plausible weekly commitment, in hours
pub const MAX_HOURS_PER_WEEK: f64 = 168.0;

/// Largest plausible yearly travel, in weeks
pub const MAX_TRAVEL_WEEKS_PER_YEAR: f64 = 52.0;

/// Questionnaire answers as collected, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLifeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_month: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_start_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_end_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_start_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_end_age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leisure_hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sports_hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_hours_per_week: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_weeks_per_year: Option<f64>,
}

/// How much a validation finding matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Input is usable; results may look odd
    Warning,
    /// Input cannot be turned into parameters
    Error,
}

/// A single problem found in the input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Field {field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("Field {field} should be a whole number (got {value}); it will be rounded")]
    Fractional { field: &'static str, value: f64 },

    #[error("Field {field} is {value}, above the plausible maximum of {max}")]
    AboveMaximum {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("Field {field} is {value}, above the limit of {max} years")]
    BeyondModeledLifespan {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{start_field} ({start}) is after {end_field} ({end}); that span counts as zero weeks")]
    InvertedRange {
        start_field: &'static str,
        start: f64,
        end_field: &'static str,
        end: f64,
    },

    #[error("{field} ({value}) is beyond life_expectancy ({life_expectancy})")]
    BeyondLifespan {
        field: &'static str,
        value: f64,
        life_expectancy: f64,
    },

    #[error("Birth date is incomplete; current_age is used instead")]
    IncompleteBirthDate,

    #[error("Birth date {year}-{month}-{day} is not a calendar date; current_age is used instead")]
    InvalidBirthDate { day: f64, month: f64, year: f64 },
}

impl ValidationError {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::MissingField { .. }
            | ValidationError::NonFinite { .. }
            | ValidationError::Negative { .. }
            | ValidationError::BeyondModeledLifespan { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Input field the finding is attached to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field }
            | ValidationError::NonFinite { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::Fractional { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::BeyondModeledLifespan { field, .. }
            | ValidationError::BeyondLifespan { field, .. } => field,
            ValidationError::InvertedRange { start_field, .. } => start_field,
            ValidationError::IncompleteBirthDate | ValidationError::InvalidBirthDate { .. } => {
                "birth_date"
            }
        }
    }
}

/// Serializable view of one validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub severity: Severity,
    pub message: String,
    #[serde(skip)]
    pub error: ValidationError,
}

impl From<ValidationError> for ValidationIssue {
    fn from(error: ValidationError) -> Self {
        Self {
            field: error.field(),
            severity: error.severity(),
            message: error.to_string(),
            error,
        }
    }
}

/// Every finding for one input record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn push(&mut self, error: ValidationError) {
        self.issues.push(error.into());
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// True when nothing blocks conversion to parameters
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Error messages joined into one line
    pub fn error_summary(&self) -> String {
        self.errors()
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl RawLifeInput {
    /// The questionnaire's suggested answers.
    ///
    /// Name, birth date, current age and life expectancy have no suggestion.
    pub fn questionnaire_defaults() -> Self {
        Self {
            sleep_hours: Some(8.0),
            study_start_age: Some(5.0),
            study_end_age: Some(22.0),
            study_hours_per_week: Some(35.0),
            work_start_age: Some(22.0),
            work_end_age: Some(65.0),
            work_hours_per_week: Some(40.0),
            leisure_hours_per_week: Some(20.0),
            sports_hours_per_week: Some(3.0),
            family_hours_per_week: Some(10.0),
            travel_weeks_per_year: Some(2.0),
            ..Default::default()
        }
    }

    /// Fill every unanswered field from `defaults`
    pub fn with_defaults(self, defaults: RawLifeInput) -> Self {
        Self {
            name: self.name.or(defaults.name),
            birth_day: self.birth_day.or(defaults.birth_day),
            birth_month: self.birth_month.or(defaults.birth_month),
            birth_year: self.birth_year.or(defaults.birth_year),
            current_age: self.current_age.or(defaults.current_age),
            life_expectancy: self.life_expectancy.or(defaults.life_expectancy),
            sleep_hours: self.sleep_hours.or(defaults.sleep_hours),
            study_start_age: self.study_start_age.or(defaults.study_start_age),
            study_end_age: self.study_end_age.or(defaults.study_end_age),
            study_hours_per_week: self.study_hours_per_week.or(defaults.study_hours_per_week),
            work_start_age: self.work_start_age.or(defaults.work_start_age),
            work_end_age: self.work_end_age.or(defaults.work_end_age),
            work_hours_per_week: self.work_hours_per_week.or(defaults.work_hours_per_week),
            leisure_hours_per_week: self
                .leisure_hours_per_week
                .or(defaults.leisure_hours_per_week),
            sports_hours_per_week: self.sports_hours_per_week.or(defaults.sports_hours_per_week),
            family_hours_per_week: self.family_hours_per_week.or(defaults.family_hours_per_week),
            travel_weeks_per_year: self.travel_weeks_per_year.or(defaults.travel_weeks_per_year),
        }
    }

    /// Birth date built from whichever components are whole, non-negative
    /// numbers
    pub fn birth_date(&self) -> BirthDate {
        BirthDate {
            day: self.birth_day.and_then(to_whole_u32),
            month: self.birth_month.and_then(to_whole_u32),
            year: self
                .birth_year
                .filter(|y| y.is_finite() && y.fract() == 0.0)
                .map(|y| y.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32),
        }
    }

    /// Check the record against the questionnaire's rules
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let birth_known = self.validate_birth_date(&mut report);

        let current_age = if !birth_known {
            check_required(&mut report, "current_age", self.current_age, true)
        } else {
            self.current_age
                .and_then(|age| check_value(&mut report, "current_age", age, true))
        };
        if let Some(age) = current_age {
            check_maximum(&mut report, "current_age", age, MAX_LIFE_EXPECTANCY_YEARS);
        }

        let life_expectancy =
            check_required(&mut report, "life_expectancy", self.life_expectancy, true);
        if let Some(years) = life_expectancy {
            if years > MAX_LIFE_EXPECTANCY_YEARS {
                report.push(ValidationError::BeyondModeledLifespan {
                    field: "life_expectancy",
                    value: years,
                    max: MAX_LIFE_EXPECTANCY_YEARS,
                });
            }
        }

        if let Some(hours) = check_required(&mut report, "sleep_hours", self.sleep_hours, false) {
            check_maximum(&mut report, "sleep_hours", hours, MAX_SLEEP_HOURS);
        }

        let study_start =
            check_required(&mut report, "study_start_age", self.study_start_age, true);
        let study_end = check_required(&mut report, "study_end_age", self.study_end_age, true);
        let work_start = check_required(&mut report, "work_start_age", self.work_start_age, true);
        let work_end = check_required(&mut report, "work_end_age", self.work_end_age, true);

        let weekly = [
            ("study_hours_per_week", self.study_hours_per_week),
            ("work_hours_per_week", self.work_hours_per_week),
            ("leisure_hours_per_week", self.leisure_hours_per_week),
            ("sports_hours_per_week", self.sports_hours_per_week),
            ("family_hours_per_week", self.family_hours_per_week),
        ];
        for (field, value) in weekly {
            if let Some(hours) = check_required(&mut report, field, value, false) {
                check_maximum(&mut report, field, hours, MAX_HOURS_PER_WEEK);
            }
        }

        if let Some(weeks) = check_required(
            &mut report,
            "travel_weeks_per_year",
            self.travel_weeks_per_year,
            true,
        ) {
            check_maximum(
                &mut report,
                "travel_weeks_per_year",
                weeks,
                MAX_TRAVEL_WEEKS_PER_YEAR,
            );
        }

        check_range(
            &mut report,
            ("study_start_age", study_start),
            ("study_end_age", study_end),
            life_expectancy,
        );
        check_range(
            &mut report,
            ("work_start_age", work_start),
            ("work_end_age", work_end),
            life_expectancy,
        );

        report
    }

    /// Returns true when the birth date is complete and real
    fn validate_birth_date(&self, report: &mut ValidationReport) -> bool {
        let components = [self.birth_day, self.birth_month, self.birth_year];
        let present = components.iter().filter(|c| c.is_some()).count();

        match (self.birth_day, self.birth_month, self.birth_year) {
            _ if present == 0 => false,
            (Some(day), Some(month), Some(year)) => {
                if self.birth_date().to_date().is_some() {
                    true
                } else {
                    report.push(ValidationError::InvalidBirthDate { day, month, year });
                    false
                }
            }
            _ => {
                report.push(ValidationError::IncompleteBirthDate);
                false
            }
        }
    }
}

/// Check a required numeric field; returns it when usable
fn check_required(
    report: &mut ValidationReport,
    field: &'static str,
    value: Option<f64>,
    whole: bool,
) -> Option<f64> {
    match value {
        None => {
            report.push(ValidationError::MissingField { field });
            None
        }
        Some(v) => check_value(report, field, v, whole),
    }
}

fn check_value(
    report: &mut ValidationReport,
    field: &'static str,
    value: f64,
    whole: bool,
) -> Option<f64> {
    if !value.is_finite() {
        report.push(ValidationError::NonFinite { field });
        return None;
    }
    if value < 0.0 {
        report.push(ValidationError::Negative { field, value });
        return None;
    }
    if whole && value.fract() != 0.0 {
        report.push(ValidationError::Fractional { field, value });
    }
    Some(value)
}

fn check_maximum(report: &mut ValidationReport, field: &'static str, value: f64, max: f64) {
    if value > max {
        report.push(ValidationError::AboveMaximum { field, value, max });
    }
}

fn check_range(
    report: &mut ValidationReport,
    (start_field, start): (&'static str, Option<f64>),
    (end_field, end): (&'static str, Option<f64>),
    life_expectancy: Option<f64>,
) {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            report.push(ValidationError::InvertedRange {
                start_field,
                start,
                end_field,
                end,
            });
        }
    }
    if let (Some(end), Some(life_expectancy)) = (end, life_expectancy) {
        if end > life_expectancy {
            report.push(ValidationError::BeyondLifespan {
                field: end_field,
                value: end,
                life_expectancy,
            });
        }
    }
}

fn to_whole_u32(value: f64) -> Option<u32> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0)
        .then(|| value.min(f64::from(u32::MAX)) as u32)
}
