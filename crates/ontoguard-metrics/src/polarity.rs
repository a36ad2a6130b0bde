// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Semantic Polarity Estimation
// ─────────────────────────────────────────────────────────────────────
//! σ_sem estimation: is recent discourse constructing ontological
//! structure or eroding it?
//!
//! The derivation of σ_sem is a policy decision, so it sits behind a
//! trait. The default estimator derives a deterministic signal from Ω
//! and its short-window trend; deployments that score polarity with an
//! external model plug in via [`ExternalPolarity`].

use ontoguard_types::{clamp_metric, MetricSnapshot};

/// Discourse classification from σ_sem, with the ±0.1 cutoffs used by
/// the structure-injection trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Constructing,
    Neutral,
    Eroding,
}

impl Polarity {
    pub fn from_sigma(sigma_sem: f64) -> Self {
        if sigma_sem > 0.1 {
            Self::Constructing
        } else if sigma_sem < -0.1 {
            Self::Eroding
        } else {
            Self::Neutral
        }
    }
}

/// Coarser tension classification with ±0.3 cutoffs, used for
/// longer-horizon reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tension {
    Accretion,
    Neutral,
    Drainage,
}

pub fn classify_tension(sigma_sem: f64) -> Tension {
    if sigma_sem > 0.3 {
        Tension::Accretion
    } else if sigma_sem < -0.3 {
        Tension::Drainage
    } else {
        Tension::Neutral
    }
}

/// Effective field ε_eff = Ω(t) × σ_sem(t).
///
/// Definitional, never independently measured.
pub fn effective_field(omega: f64, sigma_sem: f64) -> f64 {
    omega * sigma_sem
}

/// Critical drainage: ε_eff below -0.3.
pub fn is_critical_drainage(epsilon_eff: f64) -> bool {
    epsilon_eff < -0.3
}

/// Injectable σ_sem policy.
///
/// `history` is the caller-owned, ordered metric history for the
/// session (oldest first); `omega` is the current turn's coherence.
/// Implementations must return a value in [-1, 1].
pub trait PolarityEstimator: Send + Sync {
    fn estimate(&self, omega: f64, history: &[MetricSnapshot]) -> f64;
}

/// Default deterministic estimator over Ω and its rolling trend.
///
/// σ_sem blends two signals:
///   - level: how far the current Ω sits from a neutral baseline,
///     scaled so Ω = 1 maps to +1;
///   - trend: the least-squares slope of the last `window` Ω values
///     (current turn included), amplified by `trend_gain` since
///     per-turn slopes are small.
///
/// The blend is `0.6·level + 0.4·trend`, clamped to [-1, 1].
#[derive(Debug, Clone)]
pub struct OmegaTrendEstimator {
    pub neutral_omega: f64,
    pub window: usize,
    pub trend_gain: f64,
}

impl Default for OmegaTrendEstimator {
    fn default() -> Self {
        Self {
            neutral_omega: 0.5,
            window: 5,
            trend_gain: 10.0,
        }
    }
}

impl PolarityEstimator for OmegaTrendEstimator {
    fn estimate(&self, omega: f64, history: &[MetricSnapshot]) -> f64 {
        let level = (omega - self.neutral_omega) / (1.0 - self.neutral_omega);

        let start = history.len().saturating_sub(self.window.saturating_sub(1));
        let mut series: Vec<f64> = history[start..].iter().map(|s| s.omega).collect();
        series.push(omega);
        let trend = (ols_slope(&series) * self.trend_gain).clamp(-1.0, 1.0);

        clamp_metric(0.6 * level + 0.4 * trend, -1.0, 1.0)
    }
}

/// Function-pointer estimator for deployments that score polarity with
/// an external model.
type PolarityFn = Box<dyn Fn(f64, &[MetricSnapshot]) -> f64 + Send + Sync>;

pub struct ExternalPolarity {
    estimate_fn: PolarityFn,
}

impl ExternalPolarity {
    pub fn new(estimate_fn: impl Fn(f64, &[MetricSnapshot]) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            estimate_fn: Box::new(estimate_fn),
        }
    }
}

impl PolarityEstimator for ExternalPolarity {
    fn estimate(&self, omega: f64, history: &[MetricSnapshot]) -> f64 {
        clamp_metric((self.estimate_fn)(omega, history), -1.0, 1.0)
    }
}

/// Ordinary-least-squares slope over equally spaced samples.
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }
    numerator / denominator
}
