use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{TrafficLevel, TrafficReport};

const REPORT_COLUMNS: &str = "report_id, field_id, level, comment, submitted_by, submitted_at";

pub struct TrafficReportRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TrafficReportRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The `limit` most recent reports for one field, newest first
    pub async fn recent_for_field(&self, field_id: Uuid, limit: usize) -> Result<Vec<TrafficReport>> {
        let reports = sqlx::query_as::<_, TrafficReport>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM traffic_reports
            WHERE field_id = $1
            ORDER BY submitted_at DESC, report_id DESC
            LIMIT $2
            "#
        ))
        .bind(field_id)
        .bind(limit as i64)
        .fetch_all(self.pool)
        .await?;

        Ok(reports)
    }

    /// The `limit` most recent reports of each listed field in one round trip.
    ///
    /// Fields without reports are absent from the map.
    pub async fn recent_for_fields(
        &self,
        field_ids: &[Uuid],
        limit: usize,
    ) -> Result<HashMap<Uuid, Vec<TrafficReport>>> {
        if field_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TrafficReport>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM (
                SELECT {REPORT_COLUMNS},
                       ROW_NUMBER() OVER (
                           PARTITION BY field_id
                           ORDER BY submitted_at DESC, report_id DESC
                       ) AS position
                FROM traffic_reports
                WHERE field_id = ANY($2)
            ) ranked
            WHERE position <= $1
            ORDER BY field_id, submitted_at DESC, report_id DESC
            "#
        ))
        .bind(limit as i64)
        .bind(field_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_field: HashMap<Uuid, Vec<TrafficReport>> = HashMap::new();
        for report in rows {
            by_field.entry(report.field_id).or_default().push(report);
        }

        Ok(by_field)
    }

    /// Appends a report; the timestamp is assigned by the database.
    pub async fn insert(
        &self,
        field_id: Uuid,
        level: TrafficLevel,
        comment: Option<&str>,
        submitted_by: &str,
    ) -> Result<TrafficReport> {
        let result = sqlx::query_as::<_, TrafficReport>(&format!(
            r#"
            INSERT INTO traffic_reports (field_id, level, comment, submitted_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(field_id)
        .bind(level.as_str())
        .bind(comment)
        .bind(submitted_by)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_foreign_key_violation() => Err(StorageError::NotFound),
            other => other,
        }
    }

    pub async fn recent_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<TrafficReport>> {
        let reports = sqlx::query_as::<_, TrafficReport>(&format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM traffic_reports
            WHERE submitted_by = $1
            ORDER BY submitted_at DESC, report_id DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(reports)
    }
}
