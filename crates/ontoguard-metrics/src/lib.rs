// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Stability Metrics
// (C) 2024-2026 The Ontoguard Project. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Pure, deterministic metric computation over state vectors.
//!
//! Everything in this crate is side-effect-free (apart from diagnostic
//! logging) and safe to call concurrently from any number of sessions:
//!
//!   - comparator: e(t), ||e||, Lyapunov energy V, coherence Ω
//!   - polarity: σ_sem estimation and the effective field ε_eff
//!   - modified: drainage-aware Lyapunov diagnostics
//!   - entropy: Shannon entropy over normalized embeddings

pub mod comparator;
pub mod entropy;
pub mod modified;
pub mod polarity;

pub use comparator::{
    coherence, compare, error_norm, error_vector, lyapunov, lyapunov_weighted, Comparison,
};
pub use entropy::{normalized_entropy, shannon_entropy};
pub use modified::{
    alert_level, detect_toxic_coherence, erosion_index, modified_lyapunov, normalize_modified,
    AlertLevel,
};
pub use polarity::{
    classify_tension, effective_field, is_critical_drainage, ExternalPolarity,
    OmegaTrendEstimator, Polarity, PolarityEstimator, Tension,
};
