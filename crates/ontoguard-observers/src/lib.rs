// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Metric History Observers
// (C) 2024-2026 The Ontoguard Project. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Offline analysis over recorded metric histories: segment
//! statistics, linear trends, and threshold crossings. Nothing here
//! runs inside the per-turn pipeline.

pub mod trend;

pub use trend::{
    linear_trend, segment_stats, summary_statistics, threshold_crossing, Direction, MetricKind,
    SegmentStats, SeriesSummary, TrendLine, TrendReport,
};
