// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Per-Turn Audit Pipeline
// ─────────────────────────────────────────────────────────────────────
//! One conversational turn, end to end:
//!
//!   embed reference (cached) → embed candidate → compare → estimate
//!   σ_sem → decide control → [rewrite + re-embed + re-compare] →
//!   validate snapshot → assess viability → emit ledger event
//!
//! When the supervisor rewrites the candidate, the comparator and
//! polarity estimator run again on the rewrite, so the final snapshot
//! always describes the message actually emitted. Nothing is persisted
//! here; the caller forwards the returned `LedgerEvent`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ontoguard_metrics::{compare, effective_field, PolarityEstimator};
use ontoguard_types::{
    ControlAction, GovernanceModuleState, LedgerEvent, MetricSnapshot, OntoguardConfig,
    OntoguardResult, ReferenceOntology, ViabilityState,
};

use crate::cache::EmbeddingCache;
use crate::providers::{EmbeddingProvider, GenerationProvider};
use crate::supervisor::{ControlContext, ControlSupervisor};
use crate::viability::ViabilityAssessor;

/// Input for one turn. All session state (history, governance) is
/// caller-owned and passed by reference.
#[derive(Debug, Clone)]
pub struct TurnInput<'a> {
    pub session_id: &'a str,
    pub turn_index: u64,
    pub ontology: &'a ReferenceOntology,
    pub user_message: &'a str,
    pub candidate_response: &'a str,
    /// Governance module states as reported by the caller.
    pub governance: &'a [GovernanceModuleState],
    /// Ordered metric history for the session, oldest first.
    pub history: &'a [MetricSnapshot],
}

/// Result of one audited turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Metrics for the emitted message.
    pub snapshot: MetricSnapshot,
    pub action: ControlAction,
    pub viability: ViabilityState,
    /// Snapshot validation diagnostics, already logged.
    pub warnings: Vec<String>,
    /// Ready-to-append audit record.
    pub event: LedgerEvent,
}

/// The audit pipeline. One instance serves any number of sessions
/// concurrently; the embedding cache is the only shared state.
pub struct TurnAuditor {
    cache: EmbeddingCache,
    supervisor: ControlSupervisor,
    polarity: Arc<dyn PolarityEstimator>,
    assessor: ViabilityAssessor,
    config: OntoguardConfig,
}

impl TurnAuditor {
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        generation: Arc<dyn GenerationProvider>,
        polarity: Arc<dyn PolarityEstimator>,
        config: OntoguardConfig,
    ) -> Self {
        Self {
            cache: EmbeddingCache::new(embedding, config.cache_enabled),
            supervisor: ControlSupervisor::new(generation, config.clone()),
            polarity,
            assessor: ViabilityAssessor::new(config.clone()),
            config,
        }
    }

    /// Eagerly embed a session's reference text so the first turn pays
    /// no cold-start cost. Optional; `audit_turn` fills the cache lazily.
    pub fn preload_reference(&self, ontology: &ReferenceOntology) -> OntoguardResult<()> {
        self.cache.preload(&ontology.reference_text())
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Audit one turn. Fails only on embedding or dimension errors;
    /// generation failures degrade inside the supervisor.
    pub fn audit_turn(&self, input: &TurnInput<'_>) -> OntoguardResult<TurnOutcome> {
        let x_ref = self.cache.get(&input.ontology.reference_text())?;

        let mut snapshot = self.measure(input.candidate_response, &x_ref, input.history)?;

        let context = ControlContext {
            error_magnitude: snapshot.error_norm,
            stability_radius: self.config.stability_radius,
            epsilon_eff: snapshot.epsilon_eff,
            sigma_sem: snapshot.sigma_sem,
            omega: snapshot.omega,
            ontology: input.ontology.clone(),
            user_message: input.user_message.to_string(),
            plant_response: input.candidate_response.to_string(),
        };
        let action = self.supervisor.apply(&context);

        // The rewrite changed the emitted text; re-measure it so the
        // snapshot and viability describe what actually goes out. On
        // fallback the controlled message equals the candidate and the
        // first measurement stands.
        if action.intervened() && action.controlled_message != input.candidate_response {
            log::info!(
                "session {} turn {}: control applied ({:?}, magnitude {:.3})",
                input.session_id,
                input.turn_index,
                action.control_type,
                action.magnitude
            );
            snapshot = self.measure(&action.controlled_message, &x_ref, input.history)?;
        }

        let warnings = snapshot.validate();
        for warning in &warnings {
            log::warn!(
                "session {} turn {}: {warning}",
                input.session_id,
                input.turn_index
            );
        }

        let viability = self.assessor.assess(
            snapshot.error_norm,
            snapshot.omega,
            input.governance,
            input.history,
        );

        let event = LedgerEvent {
            session_id: input.session_id.to_string(),
            turn_index: input.turn_index,
            snapshot,
            action: action.clone(),
            viability: viability.clone(),
            timestamp_ms: unix_millis(),
        };

        Ok(TurnOutcome {
            snapshot,
            action,
            viability,
            warnings,
            event,
        })
    }

    /// Embed one text and compute its full metric snapshot against the
    /// reference. Candidate texts bypass the cache; they recur rarely.
    fn measure(
        &self,
        text: &str,
        x_ref: &[f64],
        history: &[MetricSnapshot],
    ) -> OntoguardResult<MetricSnapshot> {
        let x = self.cache.embed_uncached(text)?;
        let comparison = compare(&x, x_ref, self.config.lyapunov_weights.as_deref())?;
        let sigma_sem = self.polarity.estimate(comparison.omega, history);
        let epsilon_eff = effective_field(comparison.omega, sigma_sem);

        Ok(MetricSnapshot {
            v: comparison.v,
            omega: comparison.omega,
            error_norm: comparison.error_norm,
            sigma_sem,
            epsilon_eff,
        })
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
