//! Adapter for converting life_grid.input.v1 records to `LifeParameters`

use chrono::{DateTime, Utc};

use crate::elapsed::age_at;
use crate::error::GridError;
use crate::schema::raw_input::{RawLifeInput, ValidationReport};
use crate::types::LifeParameters;

/// Adapter for converting raw questionnaire input to life parameters
pub struct InputAdapter;

/// Validation outcome for one record of a batch
#[derive(Debug, Clone)]
pub struct RecordValidation {
    pub index: usize,
    pub name: Option<String>,
    pub report: ValidationReport,
}

impl InputAdapter {
    /// Parse a single JSON object
    pub fn parse_json(json: &str) -> Result<RawLifeInput, GridError> {
        let input: RawLifeInput = serde_json::from_str(json)?;
        Ok(input)
    }

    /// Parse a JSON array of records
    pub fn parse_array(json: &str) -> Result<Vec<RawLifeInput>, GridError> {
        let inputs: Vec<RawLifeInput> = serde_json::from_str(json)?;
        Ok(inputs)
    }

    /// Parse NDJSON (one record per line, blank lines ignored)
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RawLifeInput>, GridError> {
        let mut inputs = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RawLifeInput>(trimmed) {
                Ok(input) => inputs.push(input),
                Err(e) => {
                    return Err(GridError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(inputs)
    }

    /// Validate each record, returning only those with findings
    pub fn validate_records(inputs: &[RawLifeInput]) -> Vec<RecordValidation> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| RecordValidation {
                index,
                name: input.name.clone(),
                report: input.validate(),
            })
            .filter(|r| !r.report.issues.is_empty())
            .collect()
    }

    /// Convert a record to parameters.
    ///
    /// Fails when validation reports errors; warnings pass through. When the
    /// birth date is a real date, the current age is derived from it at `now`.
    pub fn to_parameters(
        input: &RawLifeInput,
        now: DateTime<Utc>,
    ) -> Result<LifeParameters, GridError> {
        let report = input.validate();
        if !report.is_valid() {
            return Err(GridError::InvalidInput(report.error_summary()));
        }
        for warning in report.warnings() {
            tracing::debug!(field = warning.field, "{}", warning.message);
        }

        let birth_date = input.birth_date();
        let current_age = match age_at(&birth_date, now) {
            Some(age) => age,
            None => whole(input.current_age, "current_age")?,
        };

        Ok(LifeParameters {
            name: input.name.clone().unwrap_or_default(),
            birth_date,
            current_age,
            life_expectancy: whole(input.life_expectancy, "life_expectancy")?,
            sleep_hours: required(input.sleep_hours, "sleep_hours")?,
            study_start_age: whole(input.study_start_age, "study_start_age")?,
            study_end_age: whole(input.study_end_age, "study_end_age")?,
            study_hours_per_week: required(input.study_hours_per_week, "study_hours_per_week")?,
            work_start_age: whole(input.work_start_age, "work_start_age")?,
            work_end_age: whole(input.work_end_age, "work_end_age")?,
            work_hours_per_week: required(input.work_hours_per_week, "work_hours_per_week")?,
            leisure_hours_per_week: required(
                input.leisure_hours_per_week,
                "leisure_hours_per_week",
            )?,
            sports_hours_per_week: required(
                input.sports_hours_per_week,
                "sports_hours_per_week",
            )?,
            family_hours_per_week: required(
                input.family_hours_per_week,
                "family_hours_per_week",
            )?,
            travel_weeks_per_year: whole(input.travel_weeks_per_year, "travel_weeks_per_year")?,
        })
    }
}

fn required(value: Option<f64>, field: &str) -> Result<f64, GridError> {
    value.ok_or_else(|| GridError::MissingField(field.to_string()))
}

fn whole(value: Option<f64>, field: &str) -> Result<u32, GridError> {
    let value = required(value, field)?;
    Ok(value.round().clamp(0.0, f64::from(u32::MAX)) as u32)
}
