use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user-proposed field awaiting admin review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FieldSuggestion {
    pub suggestion_id: Uuid,
    pub name: String,
    pub address: String,
    pub surface: String,
    pub amenities: Vec<String>,
    pub status: String,
    pub submitted_by: String,
    pub submitter_email: String,
    pub submitted_at: NaiveDateTime,
    pub processed_by: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
}

impl FieldSuggestion {
    pub fn status(&self) -> SuggestionStatus {
        SuggestionStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Older suggestions were stored without a status; those count as pending.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(SuggestionStatus::parse("approved"), SuggestionStatus::Approved);
        assert_eq!(SuggestionStatus::parse("Rejected"), SuggestionStatus::Rejected);
        assert_eq!(SuggestionStatus::parse("pending"), SuggestionStatus::Pending);
        assert_eq!(SuggestionStatus::parse(""), SuggestionStatus::Pending);
    }
}
