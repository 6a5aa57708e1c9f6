use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::ReportLevel;

/// One user's observation of how crowded a field is.
///
/// Rows are append-only. `level` keeps the raw stored label so that legacy
/// or malformed values stay visible to the consensus engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TrafficReport {
    pub report_id: Uuid,
    pub field_id: Uuid,
    pub level: String,
    pub comment: Option<String>,
    pub submitted_by: String,
    pub submitted_at: NaiveDateTime,
}

impl TrafficReport {
    pub fn report_level(&self) -> ReportLevel {
        ReportLevel::parse(&self.level)
    }
}
