//! Traffic consensus: turns a field's recent reports into one displayed level.
//!
//! Every caller (field list badge, detail headline, map marker) goes through
//! [`compute_consensus`], so the same report snapshot always yields the same
//! level, confidence and count.

use std::num::NonZeroUsize;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ConsensusLevel, ReportLevel, TrafficReport};

pub const DEFAULT_WINDOW_SIZE: usize = DEFAULT_WINDOW.get();

const DEFAULT_WINDOW: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Misuse of the engine by its caller, never caused by report data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("window size must be at least 1")]
    InvalidWindow,
}

/// Maximum number of most recent reports considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficWindow(NonZeroUsize);

impl TrafficWindow {
    pub fn new(size: usize) -> Result<Self, ConsensusError> {
        NonZeroUsize::new(size)
            .map(Self)
            .ok_or(ConsensusError::InvalidWindow)
    }

    pub fn size(&self) -> usize {
        self.0.get()
    }

    /// Reports needed to audit the cached hint: the window plus the one
    /// report that may have been appended since the hint was written.
    pub fn audit_depth(&self) -> usize {
        self.size().saturating_add(1)
    }
}

impl Default for TrafficWindow {
    fn default() -> Self {
        Self(DEFAULT_WINDOW)
    }
}

/// A report whose level is outside the canonical vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportAnomaly {
    pub report_id: Uuid,
    pub raw_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ConsensusResult {
    pub level: ConsensusLevel,
    /// Share of considered reports agreeing with `level`, 0..=100
    pub confidence: u8,
    pub report_count: usize,
    pub last_updated: Option<NaiveDateTime>,
    pub anomalies: Vec<ReportAnomaly>,
}

impl ConsensusResult {
    pub fn unknown() -> Self {
        Self {
            level: ConsensusLevel::Unknown,
            confidence: 0,
            report_count: 0,
            last_updated: None,
            anomalies: Vec::new(),
        }
    }

    pub fn has_anomalies(&self) -> bool {
        !self.anomalies.is_empty()
    }
}

/// Computes the majority level over the `window` most recent reports.
///
/// `reports` must be ordered newest first and belong to a single field.
/// Ties go to the level seen first in the input, which is the level of the
/// most recent report among the tied ones.
pub fn compute_consensus(reports: &[TrafficReport], window: TrafficWindow) -> ConsensusResult {
    let considered = &reports[..reports.len().min(window.size())];

    let Some(newest) = considered.first() else {
        return ConsensusResult::unknown();
    };

    // Buckets in first-seen order; at most four entries.
    let mut buckets: Vec<(ConsensusLevel, usize)> = Vec::with_capacity(4);
    let mut anomalies = Vec::new();

    for report in considered {
        let level = report.report_level();
        if let ReportLevel::Other(raw) = &level {
            anomalies.push(ReportAnomaly {
                report_id: report.report_id,
                raw_level: raw.clone(),
            });
        }

        let bucket = ConsensusLevel::from(&level);
        match buckets.iter_mut().find(|(b, _)| *b == bucket) {
            Some((_, count)) => *count += 1,
            None => buckets.push((bucket, 1)),
        }
    }

    let mut winner = buckets[0];
    for &(bucket, count) in &buckets[1..] {
        if count > winner.1 {
            winner = (bucket, count);
        }
    }

    let total = considered.len();
    if !anomalies.is_empty() {
        tracing::warn!(
            field_id = %newest.field_id,
            malformed = anomalies.len(),
            considered = total,
            "Traffic reports with unrecognised levels counted as 'other'"
        );
    }

    ConsensusResult {
        level: winner.0,
        confidence: percentage(winner.1, total),
        report_count: total,
        last_updated: Some(newest.submitted_at),
        anomalies,
    }
}

/// Rounds half up, matching how percentages are displayed.
fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u8
}

/// How the denormalized `current_traffic` hint relates to a fresh consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CacheStatus {
    InSync,
    /// The hint matches the consensus from before the newest report.
    Lagging,
    Diverged {
        cached: ConsensusLevel,
        computed: ConsensusLevel,
    },
}

/// Compares the cached level with the consensus recomputed from `reports`.
///
/// One report of lag is tolerated because the hint is written after the
/// report append and a reader may observe the two in between.
///
/// `reports` should hold [`TrafficWindow::audit_depth`] rows when available,
/// so the consensus before the newest report still spans a full window.
pub fn reconcile_cached_level(
    cached: &str,
    reports: &[TrafficReport],
    window: TrafficWindow,
) -> CacheStatus {
    let cached = ConsensusLevel::parse(cached);
    let computed = compute_consensus(reports, window).level;

    if cached == computed {
        return CacheStatus::InSync;
    }

    let previous = reports
        .get(1..)
        .map(|older| compute_consensus(older, window).level)
        .unwrap_or(ConsensusLevel::Unknown);

    if cached == previous {
        return CacheStatus::Lagging;
    }

    CacheStatus::Diverged { cached, computed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
            + Duration::minutes(minutes)
    }

    /// Builds newest-first reports from `(level, minute)` pairs given in that order.
    fn reports(entries: &[(&str, i64)]) -> Vec<TrafficReport> {
        let field_id = Uuid::new_v4();
        entries
            .iter()
            .map(|(level, minute)| TrafficReport {
                report_id: Uuid::new_v4(),
                field_id,
                level: level.to_string(),
                comment: None,
                submitted_by: "user-1".to_string(),
                submitted_at: at(*minute),
            })
            .collect()
    }

    fn window(size: usize) -> TrafficWindow {
        TrafficWindow::new(size).unwrap()
    }

    #[test]
    fn test_empty_input_is_unknown() {
        let result = compute_consensus(&[], window(10));
        assert_eq!(result, ConsensusResult::unknown());
        assert_eq!(result.level, ConsensusLevel::Unknown);
        assert_eq!(result.confidence, 0);
        assert_eq!(result.report_count, 0);
        assert!(result.last_updated.is_none());
    }

    #[test]
    fn test_single_report() {
        let input = reports(&[("medium", 1)]);
        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::Medium);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.report_count, 1);
        assert_eq!(result.last_updated, Some(at(1)));
    }

    #[test]
    fn test_unanimous_reports() {
        let input = reports(&[("high", 3), ("high", 2), ("high", 1)]);
        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::High);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_tie_goes_to_most_recent_level() {
        let input = reports(&[("high", 3), ("low", 2)]);
        let result = compute_consensus(&input, window(2));

        assert_eq!(result.level, ConsensusLevel::High);
        assert_eq!(result.confidence, 50);
        assert_eq!(result.report_count, 2);
        assert_eq!(result.last_updated, Some(at(3)));
    }

    #[test]
    fn test_tie_among_three_levels() {
        let input = reports(&[
            ("medium", 6),
            ("low", 5),
            ("high", 4),
            ("high", 3),
            ("low", 2),
            ("medium", 1),
        ]);
        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::Medium);
        assert_eq!(result.confidence, 33);
    }

    #[test]
    fn test_clear_majority_beats_newer_minority() {
        let input = reports(&[("low", 3), ("high", 2), ("high", 1)]);
        let result = compute_consensus(&input, window(3));

        assert_eq!(result.level, ConsensusLevel::High);
        assert_eq!(result.confidence, 67);
    }

    #[test]
    fn test_window_ignores_older_reports() {
        let mut entries: Vec<(&str, i64)> = (0..15).map(|i| ("low", 100 - i)).collect();
        entries.extend((0..5).map(|i| ("high", 50 - i)));
        let input = reports(&entries);

        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::Low);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.report_count, 10);
        assert_eq!(result.last_updated, Some(at(100)));
    }

    #[test]
    fn test_mixed_distribution() {
        let mut entries = Vec::new();
        entries.extend((0..6).map(|i| ("medium", 100 - i)));
        entries.extend((0..3).map(|i| ("low", 90 - i)));
        entries.push(("high", 80));
        let input = reports(&entries);

        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::Medium);
        assert_eq!(result.confidence, 60);
        assert_eq!(result.report_count, 10);
    }

    #[test]
    fn test_legacy_labels_count_with_canonical_ones() {
        let input = reports(&[("crowded", 3), ("high", 2), ("light", 1)]);
        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::High);
        assert_eq!(result.confidence, 67);
        assert!(!result.has_anomalies());
    }

    #[test]
    fn test_malformed_levels_are_counted_and_flagged() {
        let input = reports(&[("packed", 4), ("??", 3), ("low", 2)]);
        let result = compute_consensus(&input, window(10));

        assert_eq!(result.level, ConsensusLevel::Other);
        assert_eq!(result.confidence, 67);
        assert_eq!(result.report_count, 3);
        assert_eq!(result.anomalies.len(), 2);
        assert_eq!(result.anomalies[0].raw_level, "packed");
        assert_eq!(result.anomalies[0].report_id, input[0].report_id);
    }

    #[test]
    fn test_anomalies_outside_window_are_not_reported() {
        let input = reports(&[("low", 3), ("low", 2), ("packed", 1)]);
        let result = compute_consensus(&input, window(2));

        assert!(!result.has_anomalies());
        assert_eq!(result.report_count, 2);
    }

    #[test]
    fn test_confidence_rounds_half_up() {
        let input = reports(&[
            ("low", 8),
            ("low", 7),
            ("low", 6),
            ("low", 5),
            ("low", 4),
            ("high", 3),
            ("high", 2),
            ("high", 1),
        ]);
        let result = compute_consensus(&input, window(8));
        assert_eq!(result.confidence, 63);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let input = reports(&[("high", 4), ("low", 3), ("medium", 2), ("low", 1)]);
        let first = compute_consensus(&input, window(3));
        let second = compute_consensus(&input, window(3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_bounds_hold_for_every_window() {
        let input = reports(&[
            ("high", 9),
            ("low", 8),
            ("medium", 7),
            ("bogus", 6),
            ("low", 5),
            ("light", 4),
            ("high", 3),
        ]);

        for size in 1..=10 {
            let result = compute_consensus(&input, window(size));
            assert!(result.confidence <= 100);
            assert!(result.report_count <= size);
            assert_ne!(result.level, ConsensusLevel::Unknown);
        }
    }

    #[test]
    fn test_zero_window_is_a_usage_error() {
        assert_eq!(TrafficWindow::new(0), Err(ConsensusError::InvalidWindow));
        assert_eq!(TrafficWindow::default().size(), DEFAULT_WINDOW_SIZE);
    }

    #[test]
    fn test_cache_in_sync() {
        let input = reports(&[("low", 2), ("low", 1)]);
        assert_eq!(
            reconcile_cached_level("low", &input, window(10)),
            CacheStatus::InSync
        );
        assert_eq!(
            reconcile_cached_level("unknown", &[], window(10)),
            CacheStatus::InSync
        );
    }

    #[test]
    fn test_lag_detected_when_history_exceeds_window() {
        let history = reports(&[("low", 4), ("low", 3), ("high", 2), ("high", 1)]);
        let window = window(3);
        let before_newest = compute_consensus(&history[1..], window).level;
        assert_eq!(before_newest, ConsensusLevel::High);

        assert_eq!(
            reconcile_cached_level("high", &history[..window.audit_depth()], window),
            CacheStatus::Lagging
        );
        assert_eq!(
            reconcile_cached_level("medium", &history, window),
            CacheStatus::Diverged {
                cached: ConsensusLevel::Medium,
                computed: ConsensusLevel::Low,
            }
        );
    }

    #[test]
    fn test_audit_depth_is_one_past_window() {
        assert_eq!(window(3).audit_depth(), 4);
        assert_eq!(TrafficWindow::default().audit_depth(), DEFAULT_WINDOW_SIZE + 1);
    }

    #[test]
    fn test_cache_one_report_behind_is_lagging() {
        let input = reports(&[("high", 2), ("low", 1)]);
        assert_eq!(
            reconcile_cached_level("low", &input, window(10)),
            CacheStatus::Lagging
        );
        assert_eq!(
            reconcile_cached_level("unknown", &reports(&[("low", 1)]), window(10)),
            CacheStatus::Lagging
        );
    }

    #[test]
    fn test_cache_divergence_is_detected() {
        let input = reports(&[("low", 3), ("low", 2), ("low", 1)]);
        assert_eq!(
            reconcile_cached_level("high", &input, window(10)),
            CacheStatus::Diverged {
                cached: ConsensusLevel::High,
                computed: ConsensusLevel::Low,
            }
        );
    }
}
