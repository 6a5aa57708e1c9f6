use std::collections::HashMap;

use sqlx::PgPool;
use storage::{
    dto::{
        comment::{CommentResponse, RECENT_COMMENTS_LIMIT},
        common::{PaginatedResponse, PaginationParams},
        field::{
            CreateFieldRequest, FieldDetailResponse, FieldListEntry, FieldMarker, FieldResponse,
            NearbyFieldEntry, TrafficBadge, UpdateFieldRequest,
        },
        traffic::{ConsensusResponse, TrafficReportResponse},
    },
    error::Result,
    models::{Coordinates, Field, TrafficReport},
    repository::{comment::CommentRepository, field::FieldRepository},
    services::{
        consensus::{CacheStatus, TrafficWindow},
        geo::rank_by_distance,
        traffic::{audit_traffic_cache, consensus_for_fields, consensus_for_snapshot, field_consensus},
    },
};
use uuid::Uuid;

use crate::state::TrafficSettings;

/// Nearest other fields shown on a detail page
const DETAIL_NEARBY_COUNT: usize = 3;

type ConsensusMap = HashMap<Uuid, ConsensusResponse>;

/// One page of fields, each with its consensus badge
pub async fn list_fields(
    pool: &PgPool,
    params: &PaginationParams,
    window: TrafficWindow,
) -> Result<PaginatedResponse<FieldListEntry>> {
    let (fields, total) = FieldRepository::new(pool)
        .list_page(params.offset(), params.limit())
        .await?;
    let consensus = consensus_for_fields(pool, &fields, window).await?;

    let entries = fields
        .into_iter()
        .map(|field| {
            let traffic = badge(&consensus, field.field_id, window);
            FieldListEntry {
                field: FieldResponse::from(field),
                traffic,
            }
        })
        .collect();

    Ok(PaginatedResponse::new(
        entries,
        params.page,
        params.page_size,
        total,
    ))
}

/// Fields nearest to `origin`; unlocated fields trail the located ones
pub async fn nearby_fields(
    pool: &PgPool,
    origin: Coordinates,
    limit: usize,
    window: TrafficWindow,
) -> Result<Vec<NearbyFieldEntry>> {
    let fields = FieldRepository::new(pool).list().await?;
    let ranked: Vec<(Field, Option<f64>)> =
        rank_by_distance(origin, fields).into_iter().take(limit).collect();

    let selected: Vec<Field> = ranked.iter().map(|(field, _)| field.clone()).collect();
    let consensus = consensus_for_fields(pool, &selected, window).await?;

    Ok(nearby_entries(ranked, &consensus, window))
}

/// Map markers for every field with coordinates
pub async fn field_markers(pool: &PgPool, window: TrafficWindow) -> Result<Vec<FieldMarker>> {
    let fields = FieldRepository::new(pool).list_located().await?;
    let consensus = consensus_for_fields(pool, &fields, window).await?;

    Ok(markers(&fields, &consensus, window))
}

pub async fn get_field(pool: &PgPool, id: Uuid) -> Result<Field> {
    FieldRepository::new(pool).find_by_id(id).await
}

/// Everything the field page shows, from one report snapshot
pub async fn get_field_detailed(
    pool: &PgPool,
    id: Uuid,
    settings: TrafficSettings,
) -> Result<FieldDetailResponse> {
    let (field, reports, traffic) = field_consensus(pool, id, settings.window).await?;
    let (cache_status, recent_reports) = audit_history(&field, reports, settings);

    let recent_comments = CommentRepository::new(pool)
        .list_for_field(id, None, Some(RECENT_COMMENTS_LIMIT))
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    let nearby = match field.coordinates() {
        Some(origin) => {
            let others: Vec<Field> = FieldRepository::new(pool)
                .list_located()
                .await?
                .into_iter()
                .filter(|other| other.field_id != id)
                .collect();
            let ranked: Vec<(Field, Option<f64>)> = rank_by_distance(origin, others)
                .into_iter()
                .take(DETAIL_NEARBY_COUNT)
                .collect();
            let selected: Vec<Field> = ranked.iter().map(|(f, _)| f.clone()).collect();
            let consensus = consensus_for_fields(pool, &selected, settings.window).await?;
            nearby_entries(ranked, &consensus, settings.window)
        }
        None => Vec::new(),
    };

    Ok(FieldDetailResponse {
        field: FieldResponse::from(field),
        traffic,
        cache_status,
        recent_reports,
        recent_comments,
        nearby,
    })
}

pub async fn create_field(
    pool: &PgPool,
    request: &CreateFieldRequest,
    added_by: &str,
) -> Result<Field> {
    let field = FieldRepository::new(pool)
        .create(request, Some(added_by))
        .await?;
    tracing::info!(field_id = %field.field_id, added_by, "Field created");
    Ok(field)
}

pub async fn update_field(pool: &PgPool, id: Uuid, request: &UpdateFieldRequest) -> Result<Field> {
    let repo = FieldRepository::new(pool);

    let existing = repo.find_by_id(id).await?;
    repo.update(id, &existing, request).await
}

pub async fn delete_field(pool: &PgPool, id: Uuid) -> Result<()> {
    FieldRepository::new(pool).delete(id).await?;
    tracing::info!(field_id = %id, "Field deleted");
    Ok(())
}

/// Audits the cache against the full history, then keeps the newest reports
/// that fall inside the window for display.
fn audit_history(
    field: &Field,
    history: Vec<TrafficReport>,
    settings: TrafficSettings,
) -> (CacheStatus, Vec<TrafficReportResponse>) {
    let cache_status = audit_traffic_cache(field, &history, settings.window);

    let recent_reports = history
        .into_iter()
        .take(settings.recent_reports_limit.min(settings.window.size()))
        .map(TrafficReportResponse::from)
        .collect();

    (cache_status, recent_reports)
}

fn badge(consensus: &ConsensusMap, field_id: Uuid, window: TrafficWindow) -> TrafficBadge {
    match consensus.get(&field_id) {
        Some(found) => TrafficBadge::from(found),
        None => TrafficBadge::from(&consensus_for_snapshot(field_id, &[], window)),
    }
}

fn nearby_entries(
    ranked: Vec<(Field, Option<f64>)>,
    consensus: &ConsensusMap,
    window: TrafficWindow,
) -> Vec<NearbyFieldEntry> {
    ranked
        .into_iter()
        .map(|(field, distance)| NearbyFieldEntry {
            traffic: badge(consensus, field.field_id, window),
            distance_miles: distance.map(|d| (d * 10.0).round() / 10.0),
            field: FieldResponse::from(field),
        })
        .collect()
}

fn markers(fields: &[Field], consensus: &ConsensusMap, window: TrafficWindow) -> Vec<FieldMarker> {
    fields
        .iter()
        .filter_map(|field| {
            let position = field.coordinates()?;
            let traffic = badge(consensus, field.field_id, window);
            Some(FieldMarker {
                field_id: field.field_id,
                name: field.name.clone(),
                latitude: position.latitude,
                longitude: position.longitude,
                level: traffic.level,
                marker_color: traffic.marker_color,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use chrono::Duration;
    use storage::models::{ConsensusLevel, MarkerColor};

    fn field(name: &str, position: Option<(f64, f64)>) -> Field {
        Field {
            field_id: Uuid::new_v4(),
            name: name.to_string(),
            address: "Union County, NJ".to_string(),
            latitude: position.map(|p| p.0),
            longitude: position.map(|p| p.1),
            surface: "grass".to_string(),
            amenities: vec![],
            current_traffic: "unknown".to_string(),
            traffic_updated_at: None,
            suggestion_id: None,
            added_by: None,
            created_at: NaiveDateTime::default(),
        }
    }

    /// Newest-first reports, one minute apart.
    fn history(field_id: Uuid, levels: &[&str]) -> Vec<TrafficReport> {
        let newest = NaiveDateTime::default() + Duration::hours(1);
        levels
            .iter()
            .enumerate()
            .map(|(age, level)| TrafficReport {
                report_id: Uuid::new_v4(),
                field_id,
                level: level.to_string(),
                comment: None,
                submitted_by: "u1".to_string(),
                submitted_at: newest - Duration::minutes(age as i64),
            })
            .collect()
    }

    fn consensus_with(field_id: Uuid, levels: &[&str], window: TrafficWindow) -> ConsensusResponse {
        consensus_for_snapshot(field_id, &history(field_id, levels), window)
    }

    fn settings(window: usize, recent_reports_limit: usize) -> TrafficSettings {
        TrafficSettings {
            window: TrafficWindow::new(window).unwrap(),
            recent_reports_limit,
            nearby_limit: 10,
        }
    }

    #[test]
    fn test_markers_share_the_consensus_color() {
        let window = TrafficWindow::default();
        let busy = field("Unami Park", Some((40.6558, -74.3211)));
        let quiet = field("Meisel Avenue Park", Some((40.6972, -74.3054)));
        let hidden = field("Unmapped", None);

        let mut consensus = ConsensusMap::new();
        consensus.insert(
            busy.field_id,
            consensus_with(busy.field_id, &["high", "high", "low"], window),
        );

        let markers = markers(&[busy.clone(), quiet.clone(), hidden], &consensus, window);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].level, ConsensusLevel::High);
        assert_eq!(markers[0].marker_color, MarkerColor::Red);
        assert_eq!(markers[1].field_id, quiet.field_id);
        assert_eq!(markers[1].level, ConsensusLevel::Unknown);
        assert_eq!(markers[1].marker_color, MarkerColor::Gray);
    }

    #[test]
    fn test_badge_matches_detail_consensus() {
        let window = TrafficWindow::default();
        let pitch = field("Nomahegan Park", Some((40.6658, -74.3050)));
        let detail = consensus_with(pitch.field_id, &["medium", "low", "medium"], window);

        let mut consensus = ConsensusMap::new();
        consensus.insert(pitch.field_id, detail.clone());

        let badge = badge(&consensus, pitch.field_id, window);
        assert_eq!(badge.level, detail.level);
        assert_eq!(badge.confidence, detail.confidence);
        assert_eq!(badge.confidence, 67);
    }

    #[test]
    fn test_nearby_entries_round_distance() {
        let window = TrafficWindow::default();
        let pitch = field("Black Brook Park", Some((40.6821, -74.2908)));
        let unmapped = field("Unmapped", None);

        let entries = nearby_entries(
            vec![(pitch, Some(1.23456)), (unmapped, None)],
            &ConsensusMap::new(),
            window,
        );

        assert_eq!(entries[0].distance_miles, Some(1.2));
        assert_eq!(entries[1].distance_miles, None);
        assert_eq!(entries[1].traffic.level, ConsensusLevel::Unknown);
    }

    #[test]
    fn test_detail_tolerates_one_report_lag_past_the_window() {
        let mut pitch = field("Rahway River Park", Some((40.6003, -74.2937)));
        pitch.current_traffic = "high".to_string();
        let reports = history(pitch.field_id, &["low", "low", "high", "high"]);

        let (status, recent) = audit_history(&pitch, reports, settings(3, 10));

        assert_eq!(status, CacheStatus::Lagging);
        assert_eq!(recent.len(), 3);
    }

    #[test]
    fn test_detail_flags_cache_beyond_one_report() {
        let mut pitch = field("Warinanco Park", Some((40.6494, -74.2364)));
        pitch.current_traffic = "medium".to_string();
        let reports = history(pitch.field_id, &["low", "low", "high", "high"]);

        let (status, recent) = audit_history(&pitch, reports, settings(3, 2));

        assert_eq!(
            status,
            CacheStatus::Diverged {
                cached: ConsensusLevel::Medium,
                computed: ConsensusLevel::Low,
            }
        );
        assert_eq!(recent.len(), 2);
    }
}
