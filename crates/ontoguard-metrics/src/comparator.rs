// ─────────────────────────────────────────────────────────────────────
// Ontoguard — State Vector Comparator
// ─────────────────────────────────────────────────────────────────────
//! Pure functions turning two equal-length embeddings into error,
//! energy, and coherence metrics.
//!
//! No shared state is touched anywhere here; results depend only on
//! the inputs.

use ontoguard_types::{OntoguardError, OntoguardResult};

/// Error vector e(t) = x(t) - x_ref, elementwise.
pub fn error_vector(x: &[f64], x_ref: &[f64]) -> OntoguardResult<Vec<f64>> {
    check_dims(x, x_ref)?;
    Ok(x.iter().zip(x_ref).map(|(a, b)| a - b).collect())
}

/// Euclidean norm ||e||.
pub fn error_norm(e: &[f64]) -> f64 {
    e.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Lyapunov energy V(e) = ½·||e||² under identity weighting.
///
/// V = 0 iff x == x_ref within floating tolerance.
pub fn lyapunov(e: &[f64]) -> f64 {
    0.5 * e.iter().map(|v| v * v).sum::<f64>()
}

/// Lyapunov energy V(e) = ½·eᵀPe with a diagonal weighting matrix.
pub fn lyapunov_weighted(e: &[f64], p_diag: &[f64]) -> OntoguardResult<f64> {
    check_dims(e, p_diag)?;
    Ok(0.5 * e.iter().zip(p_diag).map(|(v, p)| p * v * v).sum::<f64>())
}

/// Coherence Ω(t) = <x, x_ref> / (||x||·||x_ref||), clamped to [-1, 1].
///
/// A zero norm on either side yields 0 with a diagnostic warning
/// rather than a division by zero.
pub fn coherence(x: &[f64], x_ref: &[f64]) -> OntoguardResult<f64> {
    check_dims(x, x_ref)?;

    let dot: f64 = x.iter().zip(x_ref).map(|(a, b)| a * b).sum();
    let norm_x = error_norm(x);
    let norm_ref = error_norm(x_ref);

    if norm_x == 0.0 || norm_ref == 0.0 {
        log::warn!("coherence: degenerate zero-norm vector, returning 0");
        return Ok(0.0);
    }

    Ok((dot / (norm_x * norm_ref)).clamp(-1.0, 1.0))
}

/// One-shot comparison bundle for a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub error: Vec<f64>,
    pub error_norm: f64,
    /// Lyapunov energy V.
    pub v: f64,
    /// Coherence Ω.
    pub omega: f64,
}

/// Compute all comparator metrics in one pass.
///
/// `p_diag`, when present, replaces the identity weighting in V.
pub fn compare(x: &[f64], x_ref: &[f64], p_diag: Option<&[f64]>) -> OntoguardResult<Comparison> {
    let error = error_vector(x, x_ref)?;
    let norm = error_norm(&error);
    let v = match p_diag {
        Some(p) => lyapunov_weighted(&error, p)?,
        None => lyapunov(&error),
    };
    let omega = coherence(x, x_ref)?;

    Ok(Comparison {
        error,
        error_norm: norm,
        v,
        omega,
    })
}

fn check_dims(a: &[f64], b: &[f64]) -> OntoguardResult<()> {
    if a.len() != b.len() {
        return Err(OntoguardError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    Ok(())
}
