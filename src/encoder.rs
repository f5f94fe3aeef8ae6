//! Report encoding
//!
//! This module wraps a grid analysis into a `LifeReport` document with
//! producer metadata and serializes it to JSON.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::GridError;
use crate::types::{GridLayout, LifeAnalysis, LifeReport, ReportProducer, WEEKS_PER_YEAR};
use crate::{LIFE_GRID_VERSION, PRODUCER_NAME};

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report encoder for producing JSON documents
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build the report document for one analysis
    pub fn encode(
        &self,
        name: &str,
        analysis: LifeAnalysis,
        computed_at: DateTime<Utc>,
    ) -> LifeReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: LIFE_GRID_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let layout = GridLayout {
            rows: analysis.grid.row_count(),
            columns: WEEKS_PER_YEAR,
            cells: analysis.grid,
        };

        LifeReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: computed_at.to_rfc3339(),
            name: name.to_string(),
            mode: analysis.mode,
            layout,
            stats: analysis.stats,
            brackets: analysis.brackets,
            insight: analysis.insight,
            current_week: analysis.current_week,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        name: &str,
        analysis: LifeAnalysis,
        computed_at: DateTime<Utc>,
    ) -> Result<String, GridError> {
        let report = self.encode(name, analysis, computed_at);
        serde_json::to_string_pretty(&report)
            .map_err(|e| GridError::EncodingError(e.to_string()))
    }

    /// Encode to a single-line JSON string
    pub fn encode_to_json_compact(
        &self,
        name: &str,
        analysis: LifeAnalysis,
        computed_at: DateTime<Utc>,
    ) -> Result<String, GridError> {
        let report = self.encode(name, analysis, computed_at);
        serde_json::to_string(&report).map_err(|e| GridError::EncodingError(e.to_string()))
    }
}
