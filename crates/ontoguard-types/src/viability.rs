// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Viability and Governance Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::action::ControlAction;
use crate::metric::MetricSnapshot;

/// The fixed set of governance modules whose activity feeds the
/// institutional admissibility margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceModule {
    CostObserver,
    NormativeRegulator,
    SemanticMemory,
    AuditIntegrity,
}

/// Caller-supplied status of one governance module. The core never
/// computes these; it only aggregates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GovernanceModuleState {
    pub module: GovernanceModule,
    pub active: bool,
    /// Effectiveness in [0, 1].
    pub effectiveness: f64,
}

/// Risk tier from fixed, non-adaptive RLD thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// RLD in [0.7, 1.0].
    Stable,
    /// RLD in [0.5, 0.7): below the stable band, no intervention yet.
    Degraded,
    /// RLD in [0.3, 0.5).
    InterventionRequired,
    /// RLD in [0.15, 0.3).
    HumanDecisionRequired,
    /// RLD in [0.05, 0.15).
    FounderDecision,
    /// RLD below 0.05.
    ShutdownSequence,
}

/// Ordinal risk of authority transfer, derived from RLD level and trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferRisk {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl TransferRisk {
    /// One ordinal step up, saturating at Critical.
    pub fn escalate(self) -> Self {
        match self {
            Self::None => Self::Low,
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Critical => Self::Critical,
        }
    }
}

/// Ordinal risk of normative collapse, derived from RLD level and trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CollapseRisk {
    None,
    Low,
    Medium,
    High,
    Imminent,
}

impl CollapseRisk {
    /// One ordinal step up, saturating at Imminent.
    pub fn escalate(self) -> Self {
        match self {
            Self::None => Self::Low,
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High | Self::Imminent => Self::Imminent,
        }
    }
}

/// Legitimacy assessment for one turn.
///
/// RLD is the minimum of the three admissibility margins: legitimacy
/// requires simultaneous admissibility in all three domains, so the
/// binding constraint is the smallest margin, never an average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityState {
    /// Dynamic admissibility margin in [0, 1].
    pub d_dyn: f64,
    /// Semantic coherence margin in [0, 1].
    pub d_sem: f64,
    /// Institutional margin in [0, 1].
    pub d_inst: f64,
    /// Reserve of dynamic legitimacy: min(d_dyn, d_sem, d_inst).
    pub rld: f64,
    pub risk_tier: RiskTier,
    pub transfer_risk: TransferRisk,
    pub collapse_risk: CollapseRisk,
    pub recommendations: Vec<String>,
}

/// One audit-ledger event, forwarded verbatim by the caller.
///
/// The core constructs this but never appends it anywhere; durable
/// recording (and any hash chaining) belongs to the ledger collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub session_id: String,
    pub turn_index: u64,
    pub snapshot: MetricSnapshot,
    pub action: ControlAction,
    pub viability: ViabilityState,
    pub timestamp_ms: u64,
}
