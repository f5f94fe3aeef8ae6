//! Life Grid - "life in weeks" allocation, statistics and bracket layout
//!
//! A lifespan is modeled as a grid of weeks, 52 per row and one row per
//! year of life expectancy. Questionnaire answers are turned into a
//! deterministic pipeline: input validation → week allocation → statistics
//! and insight → bracket layout → report encoding.
//!
//! ## Modules
//!
//! - **Allocation**: label every week cell with an activity or with lived/future
//! - **Stats**: per-category week counts, year equivalents and lifespan shares
//! - **Brackets**: row spans and gutter sides for annotating category runs

pub mod allocation;
pub mod brackets;
pub mod elapsed;
pub mod encoder;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use allocation::{allocate, allocate_at, WeekCounts};
pub use brackets::group_brackets;
pub use encoder::ReportEncoder;
pub use error::GridError;
pub use pipeline::{analyze, life_grid_report, LifeGridProcessor};
pub use stats::{aggregate, rank_insight};
pub use types::{
    BirthDate, Bracket, BracketSide, Category, CategoryStats, DisplayMode, Insight, LifeAnalysis,
    LifeParameters, LifeReport, WeekGrid, MAX_LIFE_EXPECTANCY, WEEKS_PER_YEAR,
};

// Schema exports
pub use schema::{InputAdapter, RawLifeInput, ValidationReport, INPUT_SCHEMA_VERSION};

/// Library version embedded in every report
pub const LIFE_GRID_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report documents
pub const PRODUCER_NAME: &str = "life-grid";
