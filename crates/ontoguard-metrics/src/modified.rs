// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Modified Lyapunov Diagnostics
// ─────────────────────────────────────────────────────────────────────
//! Drainage-aware Lyapunov diagnostics.
//!
//! V_mod(e, ε_eff) = V_base(e) − α·ε_eff
//!
//! Negative ε_eff (drainage) raises V_mod, surfacing instability that
//! a purely positional Lyapunov hides; positive ε_eff (accretion)
//! lowers it. This is how "toxic coherence" (logically coherent
//! discourse that erodes the ontological base) becomes visible.

use serde::{Deserialize, Serialize};

/// V_mod = V_base − α·ε_eff. Not normalized.
pub fn modified_lyapunov(v_base: f64, epsilon_eff: f64, alpha: f64) -> f64 {
    v_base - alpha * epsilon_eff
}

/// Sigmoid soft clip of V_mod to [0, 1] for reporting.
///
/// Maps roughly [-0.5, 1.5] onto (0, 1) with a smooth transition so
/// extreme values stay distinguishable.
pub fn normalize_modified(v_mod: f64) -> f64 {
    const K: f64 = 4.0;
    const CENTER: f64 = 0.5;
    let normalized = 1.0 / (1.0 + (-K * (v_mod - CENTER)).exp());
    normalized.clamp(0.0, 1.0)
}

/// Toxic coherence: high Ω, negative σ_sem, elevated V_mod.
pub fn detect_toxic_coherence(omega: f64, sigma_sem: f64, v_mod: f64) -> bool {
    omega > 0.7 && sigma_sem < -0.3 && v_mod > 0.5
}

/// Structural erosion index in [0, 1].
///
/// Zero under accretion. Under drainage, proportional to |ε_eff| and
/// amplified near the attractor (low V_base), where erosion of the
/// base is most dangerous.
pub fn erosion_index(epsilon_eff: f64, v_base: f64) -> f64 {
    if epsilon_eff >= 0.0 {
        return 0.0;
    }
    let drainage = epsilon_eff.abs();
    let proximity = 1.0 - v_base;
    (drainage * (0.5 + 0.5 * proximity)).min(1.0)
}

/// Diagnostic alert level from normalized V_mod and erosion index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Info,
    Warning,
    Critical,
}

pub fn alert_level(v_mod: f64, erosion: f64) -> AlertLevel {
    if erosion > 0.7 || v_mod > 0.8 {
        AlertLevel::Critical
    } else if erosion > 0.4 || v_mod > 0.6 {
        AlertLevel::Warning
    } else if erosion > 0.2 || v_mod > 0.4 {
        AlertLevel::Info
    } else {
        AlertLevel::None
    }
}
