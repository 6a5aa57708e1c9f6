use sqlx::PgPool;

use crate::error::Result;
use crate::models::{FieldContribution, UserStats};

/// Per-user aggregates over reports and comments
pub struct ActivityRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats_for_user(&self, user_id: &str) -> Result<UserStats> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM traffic_reports WHERE submitted_by = $1) AS total_reports,
                (SELECT COUNT(*) FROM field_comments WHERE user_id = $1) AS total_comments,
                (SELECT COUNT(DISTINCT field_id) FROM traffic_reports WHERE submitted_by = $1) AS fields_rated
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }

    /// Every field the user has reported on or commented on, unordered
    pub async fn contributions_for_user(&self, user_id: &str) -> Result<Vec<FieldContribution>> {
        let contributions = sqlx::query_as::<_, FieldContribution>(
            r#"
            SELECT
                f.field_id,
                f.name AS field_name,
                COUNT(*) FILTER (WHERE a.kind = 'report') AS report_count,
                COUNT(*) FILTER (WHERE a.kind = 'comment') AS comment_count,
                MAX(a.submitted_at) AS last_contributed_at
            FROM (
                SELECT field_id, submitted_at, 'report' AS kind
                FROM traffic_reports
                WHERE submitted_by = $1
                UNION ALL
                SELECT field_id, submitted_at, 'comment' AS kind
                FROM field_comments
                WHERE user_id = $1
            ) a
            JOIN fields f ON f.field_id = a.field_id
            GROUP BY f.field_id, f.name
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contributions)
    }
}
