use sqlx::PgPool;
use storage::{
    dto::comment::CreateCommentRequest,
    error::{Result, StorageError},
    models::FieldComment,
    repository::{comment::CommentRepository, field::FieldRepository},
    services::comment_category::{CommentCategory, resolve_category},
};
use uuid::Uuid;

pub async fn list_comments(
    pool: &PgPool,
    field_id: Uuid,
    category: Option<CommentCategory>,
) -> Result<Vec<FieldComment>> {
    FieldRepository::new(pool).find_by_id(field_id).await?;

    CommentRepository::new(pool)
        .list_for_field(field_id, category, None)
        .await
}

pub async fn post_comment(
    pool: &PgPool,
    field_id: Uuid,
    request: &CreateCommentRequest,
    user_id: &str,
    user_name: &str,
) -> Result<FieldComment> {
    let (body, category) = prepare_comment(request)?;

    let comment = CommentRepository::new(pool)
        .insert(field_id, &body, category, user_id, user_name)
        .await?;

    tracing::debug!(
        field_id = %field_id,
        category = %category,
        "Comment posted"
    );

    Ok(comment)
}

/// Trimmed body plus the stored category, detected from the text when the
/// poster left it at `general`.
fn prepare_comment(request: &CreateCommentRequest) -> Result<(String, CommentCategory)> {
    let body = request.comment.trim();
    if body.is_empty() {
        return Err(StorageError::InvalidInput(
            "Comment cannot be empty".to_string(),
        ));
    }

    let category = resolve_category(request.category.unwrap_or_default(), body);
    Ok((body.to_string(), category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(comment: &str, category: Option<CommentCategory>) -> CreateCommentRequest {
        CreateCommentRequest {
            comment: comment.to_string(),
            category,
        }
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let result = prepare_comment(&request("   \n", None));
        assert!(matches!(result, Err(StorageError::InvalidInput(_))));
    }

    #[test]
    fn test_category_is_detected_when_absent_or_general() {
        let (body, category) = prepare_comment(&request("  Lot was packed by 9am ", None)).unwrap();
        assert_eq!(body, "Lot was packed by 9am");
        assert_eq!(category, CommentCategory::Parking);

        let (_, category) = prepare_comment(&request(
            "Lights were out on the north end",
            Some(CommentCategory::General),
        ))
        .unwrap();
        assert_eq!(category, CommentCategory::Safety);
    }

    #[test]
    fn test_explicit_category_is_kept() {
        let (_, category) = prepare_comment(&request(
            "Muddy near the goal",
            Some(CommentCategory::Players),
        ))
        .unwrap();
        assert_eq!(category, CommentCategory::Players);
    }
}
