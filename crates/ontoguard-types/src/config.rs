// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Stability Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{OntoguardError, OntoguardResult};

/// Runtime configuration for the Ontoguard stability kernel.
///
/// Static per deployment: callers build it once and share it across
/// sessions. All thresholds are fixed, non-adaptive values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntoguardConfig {
    /// Stability radius ε: position control triggers when ||e(t)|| > ε.
    /// Default: 0.5.
    pub stability_radius: f64,

    /// Structure injection triggers when both ε_eff and σ_sem fall
    /// below this value (sustained semantic drainage).
    /// Default: -0.2.
    pub structure_injection_threshold: f64,

    /// Semantic penalty factor α for the modified Lyapunov function
    /// V_mod = V_base - α·ε_eff. Typical range 0.2-0.5. Default: 0.3.
    pub semantic_penalty_alpha: f64,

    /// RLD at or above this is the stable tier. Default: 0.7.
    pub rld_stable: f64,
    /// Below this, corrective intervention is required. Default: 0.5.
    pub rld_intervention: f64,
    /// Below this, a human decision is required. Default: 0.3.
    pub rld_human_decision: f64,
    /// Below this, a founder-level decision is required. Default: 0.15.
    pub rld_founder_decision: f64,
    /// Below this, the shutdown sequence tier applies. Default: 0.05.
    pub rld_shutdown: f64,

    /// Error norm at which the dynamic admissibility margin reaches 0.
    /// Default: 1.0.
    pub dynamic_error_bound: f64,

    /// Coherence Ω at which the semantic margin reaches 0. Default: 0.4.
    pub coherence_floor: f64,

    /// Whether the embedding cache stores results. When false, every
    /// lookup goes to the provider. Default: true.
    pub cache_enabled: bool,

    /// Deadline passed to the generation provider for corrective
    /// rewrites; the fallback path triggers rather than blocking the
    /// turn. Default: 30_000.
    pub generation_timeout_ms: u64,

    /// Optional diagonal weighting P for the Lyapunov form
    /// V = ½·eᵀPe. `None` means identity weighting.
    #[serde(default)]
    pub lyapunov_weights: Option<Vec<f64>>,
}

impl Default for OntoguardConfig {
    fn default() -> Self {
        Self {
            stability_radius: 0.5,
            structure_injection_threshold: -0.2,
            semantic_penalty_alpha: 0.3,
            rld_stable: 0.7,
            rld_intervention: 0.5,
            rld_human_decision: 0.3,
            rld_founder_decision: 0.15,
            rld_shutdown: 0.05,
            dynamic_error_bound: 1.0,
            coherence_floor: 0.4,
            cache_enabled: true,
            generation_timeout_ms: 30_000,
            lyapunov_weights: None,
        }
    }
}

impl OntoguardConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> OntoguardResult<()> {
        if self.stability_radius <= 0.0 {
            return Err(OntoguardError::Config(format!(
                "stability_radius must be > 0, got {}",
                self.stability_radius
            )));
        }
        if !(-1.0..=0.0).contains(&self.structure_injection_threshold) {
            return Err(OntoguardError::Config(format!(
                "structure_injection_threshold must be in [-1, 0], got {}",
                self.structure_injection_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.semantic_penalty_alpha) {
            return Err(OntoguardError::Config(format!(
                "semantic_penalty_alpha must be in [0, 1], got {}",
                self.semantic_penalty_alpha
            )));
        }
        let tiers = [
            ("rld_stable", self.rld_stable),
            ("rld_intervention", self.rld_intervention),
            ("rld_human_decision", self.rld_human_decision),
            ("rld_founder_decision", self.rld_founder_decision),
            ("rld_shutdown", self.rld_shutdown),
        ];
        for (name, value) in tiers {
            if !(0.0..=1.0).contains(&value) {
                return Err(OntoguardError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        // Tier thresholds must be strictly decreasing.
        for pair in tiers.windows(2) {
            if pair[0].1 <= pair[1].1 {
                return Err(OntoguardError::Config(format!(
                    "{} ({}) must be > {} ({})",
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1
                )));
            }
        }
        if self.dynamic_error_bound <= 0.0 {
            return Err(OntoguardError::Config(format!(
                "dynamic_error_bound must be > 0, got {}",
                self.dynamic_error_bound
            )));
        }
        if !(-1.0..1.0).contains(&self.coherence_floor) {
            return Err(OntoguardError::Config(format!(
                "coherence_floor must be in [-1, 1), got {}",
                self.coherence_floor
            )));
        }
        if self.generation_timeout_ms == 0 {
            return Err(OntoguardError::Config(
                "generation_timeout_ms must be > 0".to_string(),
            ));
        }
        if let Some(weights) = &self.lyapunov_weights {
            if weights.iter().any(|&w| w < 0.0 || !w.is_finite()) {
                return Err(OntoguardError::Config(
                    "lyapunov_weights must be finite and non-negative".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> OntoguardResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OntoguardError::Config(format!("JSON parse error: {e}")))
    }
}
