use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::FieldComment;
use crate::services::comment_category::CommentCategory;

pub const RECENT_COMMENTS_LIMIT: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub comment_id: Uuid,
    pub field_id: Uuid,
    pub comment: String,
    pub category: CommentCategory,
    pub category_label: String,
    pub user_name: String,
    pub submitted_at: NaiveDateTime,
}

impl From<FieldComment> for CommentResponse {
    fn from(comment: FieldComment) -> Self {
        let category = comment.category.parse().unwrap_or_default();
        Self {
            comment_id: comment.comment_id,
            field_id: comment.field_id,
            comment: comment.body,
            category,
            category_label: category.label().to_string(),
            user_name: comment.user_name,
            submitted_at: comment.submitted_at,
        }
    }
}

/// Request payload for posting a comment on a field
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Comment must be between 1 and 2000 characters"
    ))]
    pub comment: String,

    /// Leave empty or `general` to detect the category from the text
    #[serde(default)]
    pub category: Option<CommentCategory>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CommentFilter {
    /// A category id, or `all`
    pub category: Option<String>,
}

impl CommentFilter {
    pub fn category(&self) -> Result<Option<CommentCategory>, String> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_filter() {
        let filter = |c: Option<&str>| CommentFilter {
            category: c.map(String::from),
        };

        assert_eq!(filter(None).category(), Ok(None));
        assert_eq!(filter(Some("all")).category(), Ok(None));
        assert_eq!(
            filter(Some("safety")).category(),
            Ok(Some(CommentCategory::Safety))
        );
        assert!(filter(Some("weather")).category().is_err());
    }

    #[test]
    fn test_unknown_stored_category_reads_as_general() {
        let comment = FieldComment {
            comment_id: Uuid::new_v4(),
            field_id: Uuid::new_v4(),
            body: "nice".to_string(),
            category: "legacy".to_string(),
            user_id: "u1".to_string(),
            user_name: "sam".to_string(),
            submitted_at: NaiveDateTime::default(),
        };

        let response = CommentResponse::from(comment);
        assert_eq!(response.category, CommentCategory::General);
        assert_eq!(response.category_label, "General");
    }
}
