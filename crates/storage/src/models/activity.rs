use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifetime contribution totals for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserStats {
    pub total_reports: i64,
    pub total_comments: i64,
    /// Distinct fields the user has reported traffic on
    pub fields_rated: i64,
}

/// One user's reports and comments on a single field
#[derive(Debug, Clone, FromRow)]
pub struct FieldContribution {
    pub field_id: Uuid,
    pub field_name: String,
    pub report_count: i64,
    pub comment_count: i64,
    pub last_contributed_at: NaiveDateTime,
}

impl FieldContribution {
    pub fn total(&self) -> i64 {
        self.report_count + self.comment_count
    }
}
