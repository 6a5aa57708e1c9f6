use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::field::FieldResponse;
use crate::models::{FieldSuggestion, SuggestionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuggestionResponse {
    pub suggestion_id: Uuid,
    pub name: String,
    pub address: String,
    pub surface: String,
    pub amenities: Vec<String>,
    pub status: SuggestionStatus,
    pub submitter_email: String,
    pub submitted_at: NaiveDateTime,
    pub processed_by: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
}

impl From<FieldSuggestion> for SuggestionResponse {
    fn from(suggestion: FieldSuggestion) -> Self {
        Self {
            status: suggestion.status(),
            suggestion_id: suggestion.suggestion_id,
            name: suggestion.name,
            address: suggestion.address,
            surface: suggestion.surface,
            amenities: suggestion.amenities,
            submitter_email: suggestion.submitter_email,
            submitted_at: suggestion.submitted_at,
            processed_by: suggestion.processed_by,
            processed_at: suggestion.processed_at,
        }
    }
}

/// Result of approving a suggestion: the processed suggestion and its new field
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuggestionApprovalResponse {
    pub suggestion: SuggestionResponse,
    pub field: FieldResponse,
}

/// Request payload for proposing a new field
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSuggestionRequest {
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 255))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 500))]
    pub address: String,

    #[validate(length(min = 1, max = 50))]
    pub surface: Option<String>,

    #[serde(default)]
    pub amenities: Vec<String>,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("required");
        error.message = Some("Field name and address are required".into());
        return Err(error);
    }
    Ok(())
}

/// Suggestions awaiting review first, then processed ones; newest first within each group.
pub fn review_order(mut suggestions: Vec<FieldSuggestion>) -> Vec<FieldSuggestion> {
    suggestions.sort_by(|a, b| {
        let a_pending = a.status() == SuggestionStatus::Pending;
        let b_pending = b.status() == SuggestionStatus::Pending;
        b_pending
            .cmp(&a_pending)
            .then_with(|| b.submitted_at.cmp(&a.submitted_at))
    });
    suggestions
}
