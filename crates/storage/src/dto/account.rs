use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::comment::CommentResponse;
use super::traffic::TrafficReportResponse;
use crate::models::{FieldContribution, UserStats};

/// Fields listed under "favorite fields" on the dashboard
pub const FAVORITE_FIELDS_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FavoriteField {
    pub field_id: Uuid,
    pub name: String,
    /// Reports plus comments
    pub contributions: i64,
    pub report_count: i64,
    pub comment_count: i64,
}

impl From<FieldContribution> for FavoriteField {
    fn from(c: FieldContribution) -> Self {
        Self {
            field_id: c.field_id,
            contributions: c.total(),
            name: c.field_name,
            report_count: c.report_count,
            comment_count: c.comment_count,
        }
    }
}

/// The signed-in user's totals, most-used fields and latest contributions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserActivityResponse {
    pub stats: UserStats,
    pub favorite_fields: Vec<FavoriteField>,
    pub recent_reports: Vec<TrafficReportResponse>,
    pub recent_comments: Vec<CommentResponse>,
}

/// Most contributions first. Ties go to the field touched most recently,
/// then to the name so the order is stable.
pub fn favorite_fields(mut contributions: Vec<FieldContribution>, limit: usize) -> Vec<FavoriteField> {
    contributions.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| b.last_contributed_at.cmp(&a.last_contributed_at))
            .then_with(|| a.field_name.cmp(&b.field_name))
    });

    contributions
        .into_iter()
        .take(limit)
        .map(FavoriteField::from)
        .collect()
}
