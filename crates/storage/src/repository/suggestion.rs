use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::normalize_tags;
use crate::dto::suggestion::CreateSuggestionRequest;
use crate::error::{Result, StorageError};
use crate::models::{Field, FieldSuggestion, SuggestionStatus};
use crate::repository::field::FieldRepository;

const SUGGESTION_COLUMNS: &str = r#"
    suggestion_id, name, address, surface, amenities, status,
    submitted_by, submitter_email, submitted_at, processed_by, processed_at
"#;

pub struct SuggestionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SuggestionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<FieldSuggestion>> {
        let suggestions = sqlx::query_as::<_, FieldSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM field_suggestions ORDER BY submitted_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(suggestions)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<FieldSuggestion> {
        sqlx::query_as::<_, FieldSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM field_suggestions WHERE suggestion_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(
        &self,
        req: &CreateSuggestionRequest,
        submitted_by: &str,
        submitter_email: &str,
    ) -> Result<FieldSuggestion> {
        let surface = req
            .surface
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("grass");

        let suggestion = sqlx::query_as::<_, FieldSuggestion>(&format!(
            r#"
            INSERT INTO field_suggestions (name, address, surface, amenities, status, submitted_by, submitter_email)
            VALUES ($1, $2, $3, $4, 'pending', $5, $6)
            RETURNING {SUGGESTION_COLUMNS}
            "#
        ))
        .bind(req.name.trim())
        .bind(req.address.trim())
        .bind(surface)
        .bind(normalize_tags(&req.amenities))
        .bind(submitted_by)
        .bind(submitter_email)
        .fetch_one(self.pool)
        .await?;

        Ok(suggestion)
    }

    /// Creates the field and marks the suggestion approved atomically.
    pub async fn approve(&self, id: Uuid, processed_by: &str) -> Result<(FieldSuggestion, Field)> {
        let mut tx = self.pool.begin().await?;

        let pending = sqlx::query_as::<_, FieldSuggestion>(&format!(
            "SELECT {SUGGESTION_COLUMNS} FROM field_suggestions WHERE suggestion_id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        ensure_pending(&pending)?;

        let field = FieldRepository::create_from_suggestion(&mut tx, &pending, processed_by).await?;

        let approved = sqlx::query_as::<_, FieldSuggestion>(&format!(
            r#"
            UPDATE field_suggestions
            SET status = $2, processed_by = $3, processed_at = CURRENT_TIMESTAMP
            WHERE suggestion_id = $1
            RETURNING {SUGGESTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(SuggestionStatus::Approved.as_str())
        .bind(processed_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((approved, field))
    }

    pub async fn reject(&self, id: Uuid, processed_by: &str) -> Result<FieldSuggestion> {
        let existing = self.find_by_id(id).await?;
        ensure_pending(&existing)?;

        // The status guard keeps a concurrent approval from being overwritten.
        sqlx::query_as::<_, FieldSuggestion>(&format!(
            r#"
            UPDATE field_suggestions
            SET status = $2, processed_by = $3, processed_at = CURRENT_TIMESTAMP
            WHERE suggestion_id = $1 AND status = 'pending'
            RETURNING {SUGGESTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(SuggestionStatus::Rejected.as_str())
        .bind(processed_by)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| StorageError::ConstraintViolation("Suggestion was already processed".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM field_suggestions WHERE suggestion_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn ensure_pending(suggestion: &FieldSuggestion) -> Result<()> {
    match suggestion.status() {
        SuggestionStatus::Pending => Ok(()),
        status => Err(StorageError::ConstraintViolation(format!(
            "Suggestion is already {}",
            status.as_str()
        ))),
    }
}
