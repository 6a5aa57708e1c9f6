use sqlx::PgPool;
use storage::{
    dto::traffic::{ConsensusResponse, SubmitReportResponse, TrafficReportResponse},
    error::Result,
    models::{TrafficLevel, TrafficReport},
    repository::{field::FieldRepository, traffic_report::TrafficReportRepository},
    services::{consensus::TrafficWindow, traffic},
};
use uuid::Uuid;

/// Fresh consensus for one field
pub async fn field_traffic(
    pool: &PgPool,
    field_id: Uuid,
    window: TrafficWindow,
) -> Result<ConsensusResponse> {
    let (_, _, consensus) = traffic::field_consensus(pool, field_id, window).await?;
    Ok(consensus)
}

/// Report history, newest first
pub async fn field_reports(pool: &PgPool, field_id: Uuid, limit: usize) -> Result<Vec<TrafficReport>> {
    FieldRepository::new(pool).find_by_id(field_id).await?;

    TrafficReportRepository::new(pool)
        .recent_for_field(field_id, limit)
        .await
}

pub async fn submit_report(
    pool: &PgPool,
    field_id: Uuid,
    level: TrafficLevel,
    comment: Option<&str>,
    submitted_by: &str,
    window: TrafficWindow,
) -> Result<SubmitReportResponse> {
    let (report, consensus) =
        traffic::submit_report(pool, field_id, level, comment, submitted_by, window).await?;

    Ok(SubmitReportResponse {
        report: TrafficReportResponse::from(report),
        consensus,
    })
}
