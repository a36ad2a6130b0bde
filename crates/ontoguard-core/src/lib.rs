// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Stability Kernel Core Engine
// (C) 2024-2026 The Ontoguard Project. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Per-turn semantic stability audit: embedding cache, control
//! supervisor, viability assessor, and the pipeline that wires them.
//!
//! # Pipeline Invariants
//!
//! 1. **Turn ordering is strict**: embed → compare → decide control →
//!    [regenerate + re-compare] → assess viability. Each step consumes
//!    the previous step's output; nothing in a turn is reordered or
//!    parallelized. Sessions are independent and share only the cache.
//!
//! 2. **Embedding failure is fatal, generation failure is not**: a
//!    turn without valid state vectors cannot produce metrics and
//!    aborts; a failed corrective rewrite fails open to the original
//!    candidate with the fallback recorded in `reasoning`.
//!
//! 3. **The final snapshot describes the emitted message**: when the
//!    supervisor rewrites the candidate, the comparator and polarity
//!    estimator run again on the rewrite before viability is assessed.
//!
//! 4. **The core persists nothing**: every outcome carries a ready
//!    `LedgerEvent` the caller forwards verbatim to the audit ledger.

pub mod cache;
pub mod providers;
pub mod supervisor;
pub mod turn;
pub mod viability;

pub use cache::{CacheStats, EmbeddingCache};
pub use providers::{
    ChatMessage, ChatRole, EmbeddingProvider, ExternalEmbedding, ExternalGeneration,
    GenerationProvider, HashEmbedding,
};
pub use supervisor::{requires_control, ControlContext, ControlSupervisor, ControlTriggers};
pub use turn::{TurnAuditor, TurnInput, TurnOutcome};
pub use viability::ViabilityAssessor;
