// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Stability Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Ontoguard kernel failures.
#[derive(Error, Debug)]
pub enum OntoguardError {
    /// Embedding provider failed. Fatal to the turn: no metric can be
    /// produced without valid state vectors.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Generation provider failed or timed out. Recoverable: the
    /// supervisor fails open to the uncontrolled candidate.
    #[error("generation error: {0}")]
    Generation(String),

    /// Compared vectors have different dimensions.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid input (ontology, message, history slice).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Numerical error (NaN/Inf in computation).
    #[error("numerical error: {0}")]
    Numerical(String),
}

pub type OntoguardResult<T> = Result<T, OntoguardError>;
