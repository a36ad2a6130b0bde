// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Temporal Trend Analysis
// ─────────────────────────────────────────────────────────────────────
//! Retrospective statistics over a session's metric history.
//!
//! The audit pipeline treats history as read-only context; this module
//! is where the history itself becomes the object of study. All
//! functions take an ordered slice of snapshots (oldest first) and a
//! [`MetricKind`] selector, and return plain data the caller can
//! serialize into reports.

use serde::{Deserialize, Serialize};

use ontoguard_types::MetricSnapshot;

/// Which metric of a snapshot a trend query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    V,
    Omega,
    ErrorNorm,
    SigmaSem,
    EpsilonEff,
}

impl MetricKind {
    pub fn extract(self, snapshot: &MetricSnapshot) -> f64 {
        match self {
            Self::V => snapshot.v,
            Self::Omega => snapshot.omega,
            Self::ErrorNorm => snapshot.error_norm,
            Self::SigmaSem => snapshot.sigma_sem,
            Self::EpsilonEff => snapshot.epsilon_eff,
        }
    }
}

/// Statistics for one contiguous segment of a session.
///
/// `stability` is 1 - std/|mean|, clamped to [0, 1]: a series that
/// never moves scores 1, a series whose spread rivals its level scores
/// 0. A zero mean makes the ratio meaningless and also scores 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub start_turn: usize,
    pub end_turn: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    pub stability: f64,
}

/// Per-segment statistics over `history[start..end]` (end exclusive).
///
/// Returns `None` for an empty or out-of-bounds range.
pub fn segment_stats(
    history: &[MetricSnapshot],
    metric: MetricKind,
    start: usize,
    end: usize,
) -> Option<SegmentStats> {
    if start >= end || end > history.len() {
        return None;
    }
    let values: Vec<f64> = history[start..end].iter().map(|s| metric.extract(s)).collect();

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let std = std_dev(&values, mean);

    let stability = if mean == 0.0 {
        0.0
    } else {
        (1.0 - std / mean.abs()).clamp(0.0, 1.0)
    };

    Some(SegmentStats {
        start_turn: start,
        end_turn: end - 1,
        mean,
        min,
        max,
        std,
        stability,
    })
}

/// Qualitative slope classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increasing,
    Decreasing,
    Flat,
}

/// Slope below this magnitude per turn counts as flat.
const FLAT_SLOPE: f64 = 1e-3;

/// Least-squares line over a metric series, turn index as x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub direction: Direction,
}

/// Ordinary least squares fit over the whole history.
///
/// Returns `None` for fewer than two samples, where a slope is
/// undefined.
pub fn linear_trend(history: &[MetricSnapshot], metric: MetricKind) -> Option<TrendLine> {
    let n = history.len();
    if n < 2 {
        return None;
    }
    let values: Vec<f64> = history.iter().map(|s| metric.extract(s)).collect();

    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    let slope = numerator / denominator;
    let intercept = mean_y - slope * mean_x;

    let direction = if slope.abs() < FLAT_SLOPE {
        Direction::Flat
    } else if slope > 0.0 {
        Direction::Increasing
    } else {
        Direction::Decreasing
    };

    Some(TrendLine {
        slope,
        intercept,
        direction,
    })
}

/// Whole-series summary for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    /// std/|mean|; 0 when the mean is 0.
    pub coefficient_of_variation: f64,
}

pub fn summary_statistics(history: &[MetricSnapshot], metric: MetricKind) -> Option<SeriesSummary> {
    if history.is_empty() {
        return None;
    }
    let mut values: Vec<f64> = history.iter().map(|s| metric.extract(s)).collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    };
    let std = std_dev(&values, mean);
    let min = values[0];
    let max = values[n - 1];

    Some(SeriesSummary {
        mean,
        median,
        std,
        min,
        max,
        range: max - min,
        coefficient_of_variation: if mean == 0.0 { 0.0 } else { std / mean.abs() },
    })
}

/// Index of the first turn where the metric drops below `threshold`,
/// or `None` if it never does.
pub fn threshold_crossing(
    history: &[MetricSnapshot],
    metric: MetricKind,
    threshold: f64,
) -> Option<usize> {
    history
        .iter()
        .position(|s| metric.extract(s) < threshold)
}

/// Full report for one metric over one session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub metric: MetricKind,
    pub summary: SeriesSummary,
    pub trend: Option<TrendLine>,
    pub segments: Vec<SegmentStats>,
}

impl TrendReport {
    /// Build a report, splitting the history into fixed-width segments
    /// (the last one may be shorter).
    pub fn build(
        history: &[MetricSnapshot],
        metric: MetricKind,
        segment_width: usize,
    ) -> Option<Self> {
        let summary = summary_statistics(history, metric)?;
        let trend = linear_trend(history, metric);

        let mut segments = Vec::new();
        if segment_width > 0 {
            let mut start = 0;
            while start < history.len() {
                let end = (start + segment_width).min(history.len());
                if let Some(stats) = segment_stats(history, metric, start, end) {
                    segments.push(stats);
                }
                start = end;
            }
        }

        Some(Self {
            metric,
            summary,
            trend,
            segments,
        })
    }
}

/// Population standard deviation.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(metric_values: &[f64]) -> Vec<MetricSnapshot> {
        metric_values
            .iter()
            .map(|&omega| MetricSnapshot {
                v: 0.1,
                omega,
                error_norm: 0.2,
                sigma_sem: 0.0,
                epsilon_eff: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_metric_kind_extracts_fields() {
        let s = MetricSnapshot {
            v: 1.0,
            omega: 2.0,
            error_norm: 3.0,
            sigma_sem: 4.0,
            epsilon_eff: 5.0,
        };
        assert_eq!(MetricKind::V.extract(&s), 1.0);
        assert_eq!(MetricKind::Omega.extract(&s), 2.0);
        assert_eq!(MetricKind::ErrorNorm.extract(&s), 3.0);
        assert_eq!(MetricKind::SigmaSem.extract(&s), 4.0);
        assert_eq!(MetricKind::EpsilonEff.extract(&s), 5.0);
    }

    #[test]
    fn test_segment_stats_constant_series() {
        let history = history_with(&[0.8, 0.8, 0.8, 0.8]);
        let stats = segment_stats(&history, MetricKind::Omega, 0, 4).unwrap();
        assert_eq!(stats.mean, 0.8);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.stability, 1.0);
        assert_eq!(stats.start_turn, 0);
        assert_eq!(stats.end_turn, 3);
    }

    #[test]
    fn test_segment_stats_volatile_series_low_stability() {
        let history = history_with(&[0.1, 0.9, 0.1, 0.9]);
        let stats = segment_stats(&history, MetricKind::Omega, 0, 4).unwrap();
        assert!(stats.stability < 0.3, "stability = {}", stats.stability);
    }

    #[test]
    fn test_segment_stats_zero_mean() {
        let history = history_with(&[-0.5, 0.5]);
        let stats = segment_stats(&history, MetricKind::Omega, 0, 2).unwrap();
        assert_eq!(stats.stability, 0.0);
    }

    #[test]
    fn test_segment_stats_empty_range() {
        let history = history_with(&[0.5]);
        assert!(segment_stats(&history, MetricKind::Omega, 1, 1).is_none());
        assert!(segment_stats(&history, MetricKind::Omega, 0, 2).is_none());
    }

    #[test]
    fn test_linear_trend_exact_line() {
        // omega = 0.1 + 0.2*turn
        let history = history_with(&[0.1, 0.3, 0.5, 0.7]);
        let trend = linear_trend(&history, MetricKind::Omega).unwrap();
        assert!((trend.slope - 0.2).abs() < 1e-9);
        assert!((trend.intercept - 0.1).abs() < 1e-9);
        assert_eq!(trend.direction, Direction::Increasing);
    }

    #[test]
    fn test_linear_trend_decreasing() {
        let history = history_with(&[0.9, 0.7, 0.5, 0.3]);
        let trend = linear_trend(&history, MetricKind::Omega).unwrap();
        assert_eq!(trend.direction, Direction::Decreasing);
    }

    #[test]
    fn test_linear_trend_flat() {
        let history = history_with(&[0.5, 0.5, 0.5]);
        let trend = linear_trend(&history, MetricKind::Omega).unwrap();
        assert_eq!(trend.direction, Direction::Flat);
        assert!(trend.slope.abs() < 1e-9);
    }

    #[test]
    fn test_linear_trend_needs_two_samples() {
        let history = history_with(&[0.5]);
        assert!(linear_trend(&history, MetricKind::Omega).is_none());
    }

    #[test]
    fn test_summary_statistics_odd_median() {
        let history = history_with(&[0.9, 0.1, 0.5]);
        let summary = summary_statistics(&history, MetricKind::Omega).unwrap();
        assert_eq!(summary.median, 0.5);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.9);
        assert!((summary.range - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_summary_statistics_even_median() {
        let history = history_with(&[0.2, 0.4, 0.6, 0.8]);
        let summary = summary_statistics(&history, MetricKind::Omega).unwrap();
        assert!((summary.median - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_summary_statistics_empty() {
        assert!(summary_statistics(&[], MetricKind::Omega).is_none());
    }

    #[test]
    fn test_threshold_crossing_found() {
        let history = history_with(&[0.9, 0.8, 0.4, 0.9]);
        assert_eq!(threshold_crossing(&history, MetricKind::Omega, 0.5), Some(2));
    }

    #[test]
    fn test_threshold_crossing_absent() {
        let history = history_with(&[0.9, 0.8]);
        assert_eq!(threshold_crossing(&history, MetricKind::Omega, 0.5), None);
    }

    #[test]
    fn test_report_segments_cover_history() {
        let history = history_with(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]);
        let report = TrendReport::build(&history, MetricKind::Omega, 3).unwrap();
        assert_eq!(report.segments.len(), 3);
        assert_eq!(report.segments[0].start_turn, 0);
        assert_eq!(report.segments[2].end_turn, 6);
        assert_eq!(report.trend.as_ref().unwrap().direction, Direction::Increasing);
    }

    #[test]
    fn test_report_zero_width_skips_segments() {
        let history = history_with(&[0.1, 0.2]);
        let report = TrendReport::build(&history, MetricKind::Omega, 0).unwrap();
        assert!(report.segments.is_empty());
    }
}
