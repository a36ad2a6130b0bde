// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Metric Snapshot and Reference Ontology
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_metric(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_metric: NaN detected, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_metric: Inf detected, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Reference ontology: the fixed point the session is audited against.
///
/// Immutable per session unless explicitly redefined. Its embedding is
/// computed once and reused every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceOntology {
    pub purpose: String,
    pub limits: String,
    pub ethics: String,
}

impl ReferenceOntology {
    pub fn new(
        purpose: impl Into<String>,
        limits: impl Into<String>,
        ethics: impl Into<String>,
    ) -> Self {
        Self {
            purpose: purpose.into(),
            limits: limits.into(),
            ethics: ethics.into(),
        }
    }

    /// Concatenated reference text whose embedding anchors the session.
    ///
    /// Plain labeled-field concatenation, nothing more.
    pub fn reference_text(&self) -> String {
        format!(
            "Purpose: {} Limits: {} Ethics: {}",
            self.purpose, self.limits, self.ethics
        )
    }
}

/// One turn's stability metrics.
///
/// Produced fresh each turn; persistence belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Lyapunov energy V = ½·eᵀPe. Non-negative.
    pub v: f64,
    /// Coherence Ω: cosine similarity to the reference, in [-1, 1].
    pub omega: f64,
    /// Error norm ||e(t)||. Non-negative.
    pub error_norm: f64,
    /// Semantic polarity σ_sem in [-1, 1]: constructing (+) vs eroding (-).
    pub sigma_sem: f64,
    /// Effective field ε_eff = Ω·σ_sem, in [-1, 1].
    pub epsilon_eff: f64,
}

/// Tolerance for the ε_eff = Ω·σ_sem consistency check.
pub const EPSILON_EFF_TOLERANCE: f64 = 0.01;

impl MetricSnapshot {
    /// Range and consistency diagnostics.
    ///
    /// Out-of-range metrics indicate a surprising input or a
    /// misconfigured estimator, not a turn-ending fault: warnings are
    /// reported, never thrown.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.v < 0.0 {
            warnings.push(format!("V out of range [0, inf): {:.3}", self.v));
        }
        if !(-1.0..=1.0).contains(&self.omega) {
            warnings.push(format!("Omega out of range [-1, 1]: {:.3}", self.omega));
        }
        if self.error_norm < 0.0 {
            warnings.push(format!(
                "error_norm out of range [0, inf): {:.3}",
                self.error_norm
            ));
        }
        if !(-1.0..=1.0).contains(&self.sigma_sem) {
            warnings.push(format!(
                "sigma_sem out of range [-1, 1]: {:.3}",
                self.sigma_sem
            ));
        }
        if !(-1.0..=1.0).contains(&self.epsilon_eff) {
            warnings.push(format!(
                "epsilon_eff out of range [-1, 1]: {:.3}",
                self.epsilon_eff
            ));
        }

        let expected = self.omega * self.sigma_sem;
        if (self.epsilon_eff - expected).abs() > EPSILON_EFF_TOLERANCE {
            warnings.push(format!(
                "epsilon_eff inconsistent: expected {:.3}, got {:.3}",
                expected, self.epsilon_eff
            ));
        }

        warnings
    }
}
