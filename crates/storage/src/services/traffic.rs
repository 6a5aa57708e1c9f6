use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::traffic::ConsensusResponse;
use crate::error::Result;
use crate::models::{Field, TrafficLevel, TrafficReport};
use crate::repository::field::FieldRepository;
use crate::repository::traffic_report::TrafficReportRepository;
use crate::services::consensus::{
    CacheStatus, TrafficWindow, compute_consensus, reconcile_cached_level,
};

/// Consensus over an already fetched snapshot, stamped with the current time
pub fn consensus_for_snapshot(
    field_id: Uuid,
    reports: &[TrafficReport],
    window: TrafficWindow,
) -> ConsensusResponse {
    let result = compute_consensus(reports, window);
    ConsensusResponse::new(field_id, result, window, Utc::now().naive_utc())
}

/// Fetches the recent reports for one existing field and aggregates them.
///
/// The returned history reaches one report past the window so it can be
/// handed to [`audit_traffic_cache`]; the consensus only counts the window.
/// A missing field is `NotFound`; a field without reports yields `unknown`.
pub async fn field_consensus(
    pool: &PgPool,
    field_id: Uuid,
    window: TrafficWindow,
) -> Result<(Field, Vec<TrafficReport>, ConsensusResponse)> {
    let field = FieldRepository::new(pool).find_by_id(field_id).await?;
    let reports = TrafficReportRepository::new(pool)
        .recent_for_field(field_id, window.audit_depth())
        .await?;

    let consensus = consensus_for_snapshot(field_id, &reports, window);
    Ok((field, reports, consensus))
}

/// Consensus for many fields from a single report query
pub async fn consensus_for_fields(
    pool: &PgPool,
    fields: &[Field],
    window: TrafficWindow,
) -> Result<HashMap<Uuid, ConsensusResponse>> {
    let field_ids: Vec<Uuid> = fields.iter().map(|f| f.field_id).collect();
    let mut reports = TrafficReportRepository::new(pool)
        .recent_for_fields(&field_ids, window.size())
        .await?;

    Ok(fields
        .iter()
        .map(|field| {
            let snapshot = reports.remove(&field.field_id).unwrap_or_default();
            (
                field.field_id,
                consensus_for_snapshot(field.field_id, &snapshot, window),
            )
        })
        .collect())
}

/// Compares the field's cached hint with the fresh history, logging divergence.
///
/// `reports` is newest first and should reach [`TrafficWindow::audit_depth`].
pub fn audit_traffic_cache(
    field: &Field,
    reports: &[TrafficReport],
    window: TrafficWindow,
) -> CacheStatus {
    let status = reconcile_cached_level(&field.current_traffic, reports, window);

    if let CacheStatus::Diverged { cached, computed } = &status {
        tracing::warn!(
            field_id = %field.field_id,
            %cached,
            %computed,
            "Cached traffic level diverges from recomputed consensus"
        );
    }

    status
}

/// Appends a report, then refreshes the field's cached level.
///
/// The append is the only step that can fail the submission. The recount
/// and cache refresh are best effort: a failure there is logged and the
/// consensus is returned as `None`.
pub async fn submit_report(
    pool: &PgPool,
    field_id: Uuid,
    level: TrafficLevel,
    comment: Option<&str>,
    submitted_by: &str,
    window: TrafficWindow,
) -> Result<(TrafficReport, Option<ConsensusResponse>)> {
    let reports = TrafficReportRepository::new(pool);
    let report = reports.insert(field_id, level, comment, submitted_by).await?;

    tracing::info!(
        field_id = %field_id,
        report_id = %report.report_id,
        level = %level,
        "Traffic report submitted"
    );

    let snapshot = match reports.recent_for_field(field_id, window.size()).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(field_id = %field_id, error = %e, "Could not recount traffic after report");
            return Ok((report, None));
        }
    };

    let consensus = consensus_for_snapshot(field_id, &snapshot, window);

    if let Err(e) = FieldRepository::new(pool)
        .update_traffic_cache(field_id, consensus.level)
        .await
    {
        tracing::warn!(field_id = %field_id, error = %e, "Could not refresh cached traffic level");
    }

    Ok((report, Some(consensus)))
}
