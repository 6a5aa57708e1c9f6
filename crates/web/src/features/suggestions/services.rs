use sqlx::PgPool;
use storage::{
    dto::suggestion::{CreateSuggestionRequest, review_order},
    error::Result,
    models::{Field, FieldSuggestion},
    repository::suggestion::SuggestionRepository,
};
use uuid::Uuid;

pub async fn create_suggestion(
    pool: &PgPool,
    request: &CreateSuggestionRequest,
    submitted_by: &str,
    submitter_email: &str,
) -> Result<FieldSuggestion> {
    let suggestion = SuggestionRepository::new(pool)
        .create(request, submitted_by, submitter_email)
        .await?;

    tracing::info!(
        suggestion_id = %suggestion.suggestion_id,
        name = %suggestion.name,
        "Field suggested"
    );

    Ok(suggestion)
}

/// Pending suggestions first, then processed ones
pub async fn list_for_review(pool: &PgPool) -> Result<Vec<FieldSuggestion>> {
    let suggestions = SuggestionRepository::new(pool).list().await?;
    Ok(review_order(suggestions))
}

pub async fn approve_suggestion(
    pool: &PgPool,
    id: Uuid,
    admin_email: &str,
) -> Result<(FieldSuggestion, Field)> {
    let (suggestion, field) = SuggestionRepository::new(pool).approve(id, admin_email).await?;

    tracing::info!(
        suggestion_id = %id,
        field_id = %field.field_id,
        processed_by = admin_email,
        "Suggestion approved"
    );

    Ok((suggestion, field))
}

pub async fn reject_suggestion(
    pool: &PgPool,
    id: Uuid,
    admin_email: &str,
) -> Result<FieldSuggestion> {
    let suggestion = SuggestionRepository::new(pool).reject(id, admin_email).await?;
    tracing::info!(suggestion_id = %id, processed_by = admin_email, "Suggestion rejected");
    Ok(suggestion)
}

pub async fn delete_suggestion(pool: &PgPool, id: Uuid) -> Result<()> {
    SuggestionRepository::new(pool).delete(id).await
}
