// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Stability Kernel Types
// (C) 2024-2026 The Ontoguard Project. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! Ontoguard stability kernel, the per-turn semantic stability audit
//! for operator/model interactions.

pub mod action;
pub mod config;
pub mod error;
pub mod metric;
pub mod viability;

pub use action::{ControlAction, ControlType};
pub use config::OntoguardConfig;
pub use error::{OntoguardError, OntoguardResult};
pub use metric::{clamp_metric, MetricSnapshot, ReferenceOntology, EPSILON_EFF_TOLERANCE};
pub use viability::{
    CollapseRisk, GovernanceModule, GovernanceModuleState, LedgerEvent, RiskTier, TransferRisk,
    ViabilityState,
};
