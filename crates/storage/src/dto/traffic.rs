use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{ConsensusLevel, MarkerColor, TrafficLevel, TrafficReport};
use crate::services::consensus::{ConsensusResult, ReportAnomaly, TrafficWindow};

pub const MAX_WINDOW_SIZE: usize = 50;

/// Consensus for one field as every view displays it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsensusResponse {
    pub field_id: Uuid,
    pub level: ConsensusLevel,
    pub marker_color: MarkerColor,
    pub confidence: u8,
    pub report_count: usize,
    pub window_size: usize,
    pub last_updated: Option<NaiveDateTime>,
    /// When the report snapshot behind this result was taken
    pub computed_at: NaiveDateTime,
    #[serde(default)]
    pub anomalies: Vec<AnomalyResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnomalyResponse {
    pub report_id: Uuid,
    pub raw_level: String,
}

impl From<ReportAnomaly> for AnomalyResponse {
    fn from(anomaly: ReportAnomaly) -> Self {
        Self {
            report_id: anomaly.report_id,
            raw_level: anomaly.raw_level,
        }
    }
}

impl ConsensusResponse {
    pub fn new(
        field_id: Uuid,
        result: ConsensusResult,
        window: TrafficWindow,
        computed_at: NaiveDateTime,
    ) -> Self {
        Self {
            field_id,
            level: result.level,
            marker_color: result.level.marker_color(),
            confidence: result.confidence,
            report_count: result.report_count,
            window_size: window.size(),
            last_updated: result.last_updated,
            computed_at,
            anomalies: result.anomalies.into_iter().map(AnomalyResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrafficReportResponse {
    pub report_id: Uuid,
    pub field_id: Uuid,
    /// Normalized level, `other` for unrecognised stored labels
    pub level: ConsensusLevel,
    pub comment: Option<String>,
    pub submitted_at: NaiveDateTime,
}

impl From<TrafficReport> for TrafficReportResponse {
    fn from(report: TrafficReport) -> Self {
        Self {
            level: ConsensusLevel::from(&report.report_level()),
            report_id: report.report_id,
            field_id: report.field_id,
            comment: report.comment,
            submitted_at: report.submitted_at,
        }
    }
}

/// Request payload for reporting how crowded a field is
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReportRequest {
    #[validate(custom(function = "validate_traffic_level"))]
    pub level: String,

    #[validate(length(max = 500, message = "Comment must be at most 500 characters"))]
    pub comment: Option<String>,
}

impl SubmitReportRequest {
    /// Canonical level; only meaningful after `validate` succeeded.
    pub fn traffic_level(&self) -> Option<TrafficLevel> {
        self.level.parse().ok()
    }

    /// Blank comments are stored as absent.
    pub fn trimmed_comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitReportResponse {
    pub report: TrafficReportResponse,
    /// Absent when the report was stored but the recount could not be read back
    pub consensus: Option<ConsensusResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WindowQuery {
    /// Overrides the configured window, 1..=50
    pub window: Option<usize>,
}

impl WindowQuery {
    pub fn resolve(&self, default: TrafficWindow) -> Result<TrafficWindow, String> {
        match self.window {
            None => Ok(default),
            Some(size) if size > MAX_WINDOW_SIZE => Err(format!(
                "window must be between 1 and {}",
                MAX_WINDOW_SIZE
            )),
            Some(size) => TrafficWindow::new(size).map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportsQuery {
    pub limit: Option<u32>,
}

impl ReportsQuery {
    pub fn resolve(&self, default: usize) -> Result<usize, String> {
        match self.limit {
            None => Ok(default),
            Some(limit) if limit >= 1 && limit as usize <= MAX_WINDOW_SIZE => Ok(limit as usize),
            Some(_) => Err(format!("limit must be between 1 and {}", MAX_WINDOW_SIZE)),
        }
    }
}

fn validate_traffic_level(level: &str) -> Result<(), validator::ValidationError> {
    if level.parse::<TrafficLevel>().is_ok() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_traffic_level"))
    }
}
