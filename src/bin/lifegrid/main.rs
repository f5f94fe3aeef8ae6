//! lifegrid CLI - Command-line interface for the life grid
//!
//! Commands:
//! - render: Draw the week grid as text with brackets, legend and stats
//! - report: Emit the JSON report document
//! - stats: Print per-category statistics
//! - validate: Validate questionnaire answers
//! - doctor: Diagnose configuration and environment
//! - schema: Print input/output schema information

mod config;
mod render;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use life_grid::schema::{InputAdapter, RawLifeInput, ValidationReport, INPUT_SCHEMA_VERSION};
use life_grid::{
    DisplayMode, GridError, LifeGridProcessor, LifeParameters, LifeReport, LIFE_GRID_VERSION,
    MAX_LIFE_EXPECTANCY, PRODUCER_NAME,
};

use config::InputDocument;

/// lifegrid - Your life in weeks
#[derive(Parser)]
#[command(name = "lifegrid")]
#[command(version = LIFE_GRID_VERSION)]
#[command(about = "Lay out a lifetime as a grid of weeks", long_about = None)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Compute as of this instant (RFC 3339) instead of now
    #[arg(long, global = true)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw the week grid as text
    Render {
        /// Answers file (.toml or .json; use - for stdin JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Display mode (normal or lived-to-date)
        #[arg(short, long, default_value = "normal")]
        mode: DisplayMode,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Emit the JSON report document
    Report {
        /// Answers file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How the input is laid out
        #[arg(long, default_value = "record")]
        input_format: InputFormat,

        /// Display mode (normal or lived-to-date)
        #[arg(short, long, default_value = "normal")]
        mode: DisplayMode,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Print per-category statistics
    Stats {
        /// Answers file (.toml or .json; use - for stdin JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate questionnaire answers
    Validate {
        /// Answers file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// How the input is laid out
        #[arg(long, default_value = "record")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,

        /// Output as JSON schema
        #[arg(long)]
        json_schema: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// One record layered over profile, defaults and environment
    Record,
    /// JSON array of records
    Json,
    /// Newline-delimited JSON (one record per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one report per line)
    Ndjson,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (life_grid.input.v1)
    Input,
    /// Output schema (life report)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout carries the rendered output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), LifeGridCliError> {
    let processor = LifeGridProcessor::at(cli.at.unwrap_or_else(Utc::now));

    match cli.command {
        Commands::Render {
            input,
            mode,
            output,
        } => cmd_render(&processor, input.as_deref(), mode, &output),
        Commands::Report {
            input,
            input_format,
            mode,
            output,
            output_format,
        } => cmd_report(
            &processor,
            input.as_deref(),
            input_format,
            mode,
            &output,
            output_format,
        ),
        Commands::Stats { input, json } => cmd_stats(&processor, input.as_deref(), json),
        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(input.as_deref(), input_format, json),
        Commands::Doctor { json } => cmd_doctor(json),
        Commands::Schema {
            schema_type,
            json_schema,
        } => cmd_schema(schema_type, json_schema),
    }
}

fn cmd_render(
    processor: &LifeGridProcessor,
    input: Option<&Path>,
    mode: DisplayMode,
    output: &Path,
) -> Result<(), LifeGridCliError> {
    let params = load_parameters(processor, input)?;
    let analysis = processor.analyze(&params, mode);
    write_output(output, &render::render(&params.name, &analysis))
}

fn cmd_report(
    processor: &LifeGridProcessor,
    input: Option<&Path>,
    input_format: InputFormat,
    mode: DisplayMode,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), LifeGridCliError> {
    let reports: Vec<LifeReport> = match input_format {
        InputFormat::Record => {
            let params = load_parameters(processor, input)?;
            vec![processor.report(&params, mode)]
        }
        InputFormat::Json | InputFormat::Ndjson => {
            let records = load_records(input, &input_format)?;
            let mut reports = Vec::with_capacity(records.len());
            for record in records {
                let params = processor.parameters(record)?;
                reports.push(processor.report(&params, mode));
            }
            reports
        }
    };
    tracing::debug!(count = reports.len(), mode = mode.as_str(), "reports built");

    let output_data = format_output(&reports, &input_format, &output_format)?;
    write_output(output, &output_data)
}

fn cmd_stats(
    processor: &LifeGridProcessor,
    input: Option<&Path>,
    json: bool,
) -> Result<(), LifeGridCliError> {
    let params = load_parameters(processor, input)?;
    let analysis = processor.analyze(&params, DisplayMode::Normal);

    if json {
        let payload = serde_json::json!({
            "stats": analysis.stats,
            "insight": analysis.insight,
            "current_week": analysis.current_week,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render::render_stats(&analysis));
    }
    Ok(())
}

fn cmd_validate(
    input: Option<&Path>,
    input_format: InputFormat,
    json: bool,
) -> Result<(), LifeGridCliError> {
    let records = match input_format {
        InputFormat::Record => vec![load_record(input)?],
        InputFormat::Json | InputFormat::Ndjson => load_records(input, &input_format)?
            .into_iter()
            .map(|r| r.with_defaults(RawLifeInput::questionnaire_defaults()))
            .collect(),
    };

    let findings = InputAdapter::validate_records(&records);
    let invalid_records = findings.iter().filter(|f| !f.report.is_valid()).count();

    let summary = ValidationSummary {
        total_records: records.len(),
        valid_records: records.len() - invalid_records,
        invalid_records,
        findings: findings
            .into_iter()
            .map(|f| RecordFindings {
                index: f.index,
                name: f.name,
                report: f.report,
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", summary.total_records);
        println!("Valid records:   {}", summary.valid_records);
        println!("Invalid records: {}", summary.invalid_records);

        if !summary.findings.is_empty() {
            println!("\nFindings:");
            for record in &summary.findings {
                for issue in &record.report.issues {
                    let level = match issue.severity {
                        life_grid::schema::Severity::Error => "[ERR]",
                        life_grid::schema::Severity::Warning => "[WARN]",
                    };
                    println!(
                        "  {} Record {} (index {}): {}",
                        level,
                        record.name.as_deref().unwrap_or("unnamed"),
                        record.index,
                        issue.message
                    );
                }
            }
        }
    }

    if summary.invalid_records > 0 {
        Err(LifeGridCliError::ValidationFailed(summary.invalid_records))
    } else {
        Ok(())
    }
}

fn cmd_doctor(json: bool) -> Result<(), LifeGridCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "life_grid_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("life-grid version {}", LIFE_GRID_VERSION),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {}", INPUT_SCHEMA_VERSION),
    });

    // Profile file
    match config::profile_path() {
        Some(path) if path.exists() => match config::load_from(Some(path.as_path()), None) {
            Ok(answers) => {
                let report = answers.validate();
                let status = if report.is_valid() {
                    CheckStatus::Ok
                } else {
                    CheckStatus::Warning
                };
                checks.push(DoctorCheck {
                    name: "profile".to_string(),
                    status,
                    message: format!(
                        "Profile {} loaded ({} finding(s))",
                        path.display(),
                        report.issues.len()
                    ),
                });
            }
            Err(e) => checks.push(DoctorCheck {
                name: "profile".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid profile {}: {}", path.display(), e),
            }),
        },
        Some(path) => checks.push(DoctorCheck {
            name: "profile".to_string(),
            status: CheckStatus::Warning,
            message: format!("No profile at {}", path.display()),
        }),
        None => checks.push(DoctorCheck {
            name: "profile".to_string(),
            status: CheckStatus::Warning,
            message: "No platform config directory".to_string(),
        }),
    }

    let overrides = config::env_overrides();
    checks.push(DoctorCheck {
        name: "environment".to_string(),
        status: CheckStatus::Ok,
        message: if overrides.is_empty() {
            format!("No {}* overrides set", config::ENV_PREFIX)
        } else {
            format!("Overrides set: {}", overrides.join(", "))
        },
    });

    // Check stdin is available (for `--input -`)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: LIFE_GRID_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("lifegrid Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(LifeGridCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType, json_schema: bool) -> Result<(), LifeGridCliError> {
    match schema_type {
        SchemaType::Input => {
            if json_schema {
                println!("{}", get_input_json_schema());
            } else {
                println!("Input Schema: {}", INPUT_SCHEMA_VERSION);
                println!();
                println!("Every field is optional; unanswered time questions take a suggested answer.");
                println!();
                println!("- name: Display name");
                println!("- birth_day, birth_month, birth_year: Birth date (all three, or ignored)");
                println!("- current_age: Years (required without a birth date)");
                println!("- life_expectancy: Years (required)");
                println!("- sleep_hours: Hours per night (8)");
                println!("- study_start_age, study_end_age: Years (5, 22)");
                println!("- study_hours_per_week: Hours (35)");
                println!("- work_start_age, work_end_age: Years (22, 65)");
                println!("- work_hours_per_week: Hours (40)");
                println!("- leisure_hours_per_week: Hours (20)");
                println!("- sports_hours_per_week: Hours (3)");
                println!("- family_hours_per_week: Hours (10)");
                println!("- travel_weeks_per_year: Weeks (2)");
                println!();
                println!(
                    "Sources, lowest priority first: defaults, profile.toml, --input, {}* env",
                    config::ENV_PREFIX
                );
            }
        }
        SchemaType::Output => {
            if json_schema {
                println!("{}", get_output_json_schema());
            } else {
                println!("Output Schema: life report {}", life_grid::encoder::REPORT_VERSION);
                println!();
                println!("- report_version: Schema version");
                println!("- producer: {{ name, version, instance_id }}");
                println!("- computed_at_utc: Reference instant");
                println!("- name, mode: Person and display mode");
                println!("- layout: {{ rows, columns, cells }} with one category id per week");
                println!("- stats: {{ total_weeks, lived_weeks, remaining_weeks, categories }}");
                println!("- brackets: [{{ category, start_row, end_row, side }}] (normal mode)");
                println!("- insight: {{ higher, lower }}");
                println!("- current_week: Index of this week (birth date known)");
            }
        }
    }
    Ok(())
}

// Helper functions

/// Layered single record: defaults, profile, `--input`, environment
fn load_record(input: Option<&Path>) -> Result<RawLifeInput, LifeGridCliError> {
    let document = input.map(InputDocument::from_arg).transpose()?;
    let answers = config::load(document.as_ref()).map_err(Box::new)?;
    tracing::debug!(?answers, "loaded answers");
    Ok(answers)
}

fn load_parameters(
    processor: &LifeGridProcessor,
    input: Option<&Path>,
) -> Result<LifeParameters, LifeGridCliError> {
    let answers = load_record(input)?;
    Ok(processor.parameters(answers)?)
}

/// Batch of independent records; no profile or environment layering
fn load_records(
    input: Option<&Path>,
    input_format: &InputFormat,
) -> Result<Vec<RawLifeInput>, LifeGridCliError> {
    let path = input.unwrap_or(Path::new("-"));
    let text = InputDocument::from_arg(path)?.read_text()?;

    let records = match input_format {
        InputFormat::Ndjson => InputAdapter::parse_ndjson(&text)?,
        InputFormat::Json | InputFormat::Record => InputAdapter::parse_array(&text)?,
    };

    if records.is_empty() {
        return Err(LifeGridCliError::NoRecords);
    }
    Ok(records)
}

fn format_output(
    reports: &[LifeReport],
    input_format: &InputFormat,
    format: &OutputFormat,
) -> Result<String, LifeGridCliError> {
    let single = matches!(input_format, InputFormat::Record);

    match format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for report in reports {
                lines.push(serde_json::to_string(report)?);
            }
            Ok(lines.join("\n") + "\n")
        }
        OutputFormat::Json if single => Ok(serde_json::to_string(&reports[0])? + "\n"),
        OutputFormat::JsonPretty if single => {
            Ok(serde_json::to_string_pretty(&reports[0])? + "\n")
        }
        OutputFormat::Json => Ok(serde_json::to_string(reports)? + "\n"),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(reports)? + "\n"),
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), LifeGridCliError> {
    if output.as_os_str() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn get_input_json_schema() -> String {
    let years = serde_json::json!({
        "type": "number",
        "minimum": 0,
        "maximum": MAX_LIFE_EXPECTANCY
    });
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": INPUT_SCHEMA_VERSION,
        "description": "Questionnaire answers for a life grid",
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "birth_day": { "type": "integer", "minimum": 1, "maximum": 31 },
            "birth_month": { "type": "integer", "minimum": 1, "maximum": 12 },
            "birth_year": { "type": "integer" },
            "current_age": years,
            "life_expectancy": years,
            "sleep_hours": { "type": "number", "minimum": 0, "maximum": 24, "default": 8 },
            "study_start_age": { "type": "number", "minimum": 0, "default": 5 },
            "study_end_age": { "type": "number", "minimum": 0, "default": 22 },
            "study_hours_per_week": { "type": "number", "minimum": 0, "maximum": 168, "default": 35 },
            "work_start_age": { "type": "number", "minimum": 0, "default": 22 },
            "work_end_age": { "type": "number", "minimum": 0, "default": 65 },
            "work_hours_per_week": { "type": "number", "minimum": 0, "maximum": 168, "default": 40 },
            "leisure_hours_per_week": { "type": "number", "minimum": 0, "maximum": 168, "default": 20 },
            "sports_hours_per_week": { "type": "number", "minimum": 0, "maximum": 168, "default": 3 },
            "family_hours_per_week": { "type": "number", "minimum": 0, "maximum": 168, "default": 10 },
            "travel_weeks_per_year": { "type": "integer", "minimum": 0, "maximum": 52, "default": 2 }
        }
    })
    .to_string()
}

fn get_output_json_schema() -> String {
    let category = serde_json::json!({
        "type": "string",
        "enum": [
            "sleep", "study", "work", "retirement", "leisure",
            "sports", "family", "travel", "future", "lived"
        ]
    });
    serde_json::json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "life_grid.report",
        "description": "Life grid report document",
        "type": "object",
        "required": [
            "report_version", "producer", "computed_at_utc", "name", "mode",
            "layout", "stats", "brackets", "insight"
        ],
        "properties": {
            "report_version": { "type": "string" },
            "producer": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "version": { "type": "string" },
                    "instance_id": { "type": "string" }
                }
            },
            "computed_at_utc": { "type": "string" },
            "name": { "type": "string" },
            "mode": { "type": "string", "enum": ["normal", "lived-to-date"] },
            "layout": {
                "type": "object",
                "properties": {
                    "rows": { "type": "integer" },
                    "columns": { "type": "integer" },
                    "cells": { "type": "array", "items": category }
                }
            },
            "stats": {
                "type": "object",
                "properties": {
                    "total_weeks": { "type": "integer" },
                    "lived_weeks": { "type": "integer" },
                    "remaining_weeks": { "type": "integer" },
                    "categories": { "type": "object" }
                }
            },
            "brackets": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": category,
                        "start_row": { "type": "integer" },
                        "end_row": { "type": "integer" },
                        "side": { "type": "string", "enum": ["left", "right"] }
                    }
                }
            },
            "insight": {
                "type": "object",
                "properties": {
                    "higher": category,
                    "lower": category
                }
            },
            "current_week": { "type": "integer" }
        }
    })
    .to_string()
}

// Error types

#[derive(Debug)]
enum LifeGridCliError {
    Io(io::Error),
    Grid(GridError),
    Json(serde_json::Error),
    Config(Box<figment::Error>),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for LifeGridCliError {
    fn from(e: io::Error) -> Self {
        LifeGridCliError::Io(e)
    }
}

impl From<GridError> for LifeGridCliError {
    fn from(e: GridError) -> Self {
        LifeGridCliError::Grid(e)
    }
}

impl From<serde_json::Error> for LifeGridCliError {
    fn from(e: serde_json::Error) -> Self {
        LifeGridCliError::Json(e)
    }
}

impl From<Box<figment::Error>> for LifeGridCliError {
    fn from(e: Box<figment::Error>) -> Self {
        LifeGridCliError::Config(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<LifeGridCliError> for CliError {
    fn from(e: LifeGridCliError) -> Self {
        match e {
            LifeGridCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            LifeGridCliError::Grid(GridError::InvalidInput(msg)) => CliError {
                code: "INVALID_INPUT".to_string(),
                message: msg,
                hint: Some("Run 'lifegrid validate' for details".to_string()),
            },
            LifeGridCliError::Grid(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!("Ensure input matches {} schema", INPUT_SCHEMA_VERSION)),
            },
            LifeGridCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            LifeGridCliError::Config(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check profile.toml, --input and LIFEGRID_* values".to_string()),
            },
            LifeGridCliError::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            LifeGridCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            LifeGridCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationSummary {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    findings: Vec<RecordFindings>,
}

#[derive(serde::Serialize)]
struct RecordFindings {
    index: usize,
    name: Option<String>,
    report: ValidationReport,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use life_grid::ReportEncoder;

    fn processor() -> LifeGridProcessor {
        LifeGridProcessor::at(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap())
            .with_encoder(ReportEncoder::with_instance_id("cli-test".to_string()))
    }

    fn report() -> LifeReport {
        processor().report(&LifeParameters::new("Marie", 34, 80), DisplayMode::Normal)
    }

    #[test]
    fn test_cli_parses_mode() {
        let cli = Cli::try_parse_from(["lifegrid", "render", "--mode", "lived-to-date"]).unwrap();
        match cli.command {
            Commands::Render { mode, .. } => assert_eq!(mode, DisplayMode::LivedToDate),
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["lifegrid", "render", "--mode", "sideways"]).is_err());
    }

    #[test]
    fn test_cli_parses_reference_time() {
        let cli =
            Cli::try_parse_from(["lifegrid", "--at", "2024-09-01T12:00:00Z", "doctor"]).unwrap();
        assert_eq!(
            cli.at,
            Some(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_format_output_single_record_is_an_object() {
        let out = format_output(&[report()], &InputFormat::Record, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(value.is_object());
        assert_eq!(value["producer"]["instance_id"], "cli-test");
    }

    #[test]
    fn test_format_output_batch() {
        let reports = vec![report(), report()];

        let out = format_output(&reports, &InputFormat::Json, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);

        let out = format_output(&reports, &InputFormat::Ndjson, &OutputFormat::Ndjson).unwrap();
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_cli_error_codes() {
        let err = CliError::from(LifeGridCliError::Grid(GridError::InvalidInput(
            "life_expectancy is required".to_string(),
        )));
        assert_eq!(err.code, "INVALID_INPUT");

        let err = CliError::from(LifeGridCliError::ValidationFailed(2));
        assert_eq!(err.message, "2 records failed validation");
    }

    #[test]
    fn test_json_schemas_are_valid_json() {
        let input: serde_json::Value = serde_json::from_str(&get_input_json_schema()).unwrap();
        assert_eq!(input["title"], INPUT_SCHEMA_VERSION);
        assert_eq!(
            input["properties"]["life_expectancy"]["maximum"],
            MAX_LIFE_EXPECTANCY
        );

        let output: serde_json::Value = serde_json::from_str(&get_output_json_schema()).unwrap();
        assert!(output["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("brackets")));
    }
}
