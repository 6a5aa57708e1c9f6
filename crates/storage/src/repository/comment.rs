use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::FieldComment;
use crate::services::comment_category::CommentCategory;

const COMMENT_COLUMNS: &str = "comment_id, field_id, body, category, user_id, user_name, submitted_at";

pub struct CommentRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Comments for a field, newest first, optionally restricted to one category
    pub async fn list_for_field(
        &self,
        field_id: Uuid,
        category: Option<CommentCategory>,
        limit: Option<i64>,
    ) -> Result<Vec<FieldComment>> {
        let comments = sqlx::query_as::<_, FieldComment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM field_comments
            WHERE field_id = $1
              AND ($2::text IS NULL OR category = $2)
            ORDER BY submitted_at DESC, comment_id DESC
            LIMIT $3
            "#
        ))
        .bind(field_id)
        .bind(category.map(|c| c.as_str()))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }

    pub async fn insert(
        &self,
        field_id: Uuid,
        body: &str,
        category: CommentCategory,
        user_id: &str,
        user_name: &str,
    ) -> Result<FieldComment> {
        let result = sqlx::query_as::<_, FieldComment>(&format!(
            r#"
            INSERT INTO field_comments (field_id, body, category, user_id, user_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(field_id)
        .bind(body)
        .bind(category.as_str())
        .bind(user_id)
        .bind(user_name)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_foreign_key_violation() => Err(StorageError::NotFound),
            other => other,
        }
    }

    pub async fn recent_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<FieldComment>> {
        let comments = sqlx::query_as::<_, FieldComment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS}
            FROM field_comments
            WHERE user_id = $1
            ORDER BY submitted_at DESC, comment_id DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(comments)
    }
}
