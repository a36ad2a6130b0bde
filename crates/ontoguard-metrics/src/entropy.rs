// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Embedding Entropy
// ─────────────────────────────────────────────────────────────────────
//! Shannon entropy over a normalized embedding.
//!
//! The entropy-like observable H is an overridable estimator with this
//! as its documented default: treat the absolute component magnitudes
//! as a probability distribution and measure its spread in bits. A
//! peaked embedding (mass in few components) scores low; a diffuse one
//! scores high.

/// Shannon entropy (bits) of |x_i| / Σ|x_j|.
///
/// Returns 0 for empty or all-zero vectors.
pub fn shannon_entropy(x: &[f64]) -> f64 {
    let total: f64 = x.iter().map(|v| v.abs()).sum();
    if total == 0.0 {
        return 0.0;
    }

    let mut h = 0.0;
    for &v in x {
        let p = v.abs() / total;
        if p > 0.0 {
            h -= p * p.log2();
        }
    }
    h
}

/// Entropy normalized to [0, 1] by the maximum log2(D) for dimension D.
pub fn normalized_entropy(x: &[f64]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }
    let max_h = (x.len() as f64).log2();
    (shannon_entropy(x) / max_h).clamp(0.0, 1.0)
}
