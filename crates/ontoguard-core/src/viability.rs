// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Viability Assessor (Reserve of Dynamic Legitimacy)
// ─────────────────────────────────────────────────────────────────────
//! Aggregates per-domain admissibility margins into the legitimacy
//! reserve RLD and its risk classification.
//!
//! Three independent margins, each in [0, 1], each measuring distance
//! from the boundary of acceptability along one axis:
//!
//!   - d_dyn: dynamic admissibility from the error norm
//!   - d_sem: semantic coherence from Ω
//!   - d_inst: institutional capacity from governance module states
//!
//! RLD = min(d_dyn, d_sem, d_inst). Legitimacy requires simultaneous
//! admissibility in all three domains, so the binding constraint is
//! the smallest margin, never an average. The assessor never infers
//! legitimacy from stability alone: two perfect margins with a
//! collapsed institutional margin still yield a collapsed RLD.

use ontoguard_types::{
    CollapseRisk, GovernanceModule, GovernanceModuleState, MetricSnapshot, OntoguardConfig,
    RiskTier, TransferRisk, ViabilityState,
};

/// Institutional weights per governance module. Normative regulation
/// and audit integrity carry the most weight.
fn module_weight(module: GovernanceModule) -> f64 {
    match module {
        GovernanceModule::CostObserver => 0.20,
        GovernanceModule::NormativeRegulator => 0.35,
        GovernanceModule::SemanticMemory => 0.20,
        GovernanceModule::AuditIntegrity => 0.25,
    }
}

/// How many trailing history entries count toward "sustained low".
const TREND_WINDOW: usize = 3;

pub struct ViabilityAssessor {
    config: OntoguardConfig,
}

impl ViabilityAssessor {
    pub fn new(config: OntoguardConfig) -> Self {
        Self { config }
    }

    /// Dynamic admissibility: larger error, smaller margin. Hits 0 at
    /// the configured dynamic error bound.
    pub fn dynamic_margin(&self, error_norm: f64) -> f64 {
        (1.0 - error_norm / self.config.dynamic_error_bound).clamp(0.0, 1.0)
    }

    /// Semantic coherence: lower Ω, smaller margin. Hits 0 at the
    /// configured coherence floor.
    pub fn semantic_margin(&self, omega: f64) -> f64 {
        ((omega - self.config.coherence_floor) / (1.0 - self.config.coherence_floor))
            .clamp(0.0, 1.0)
    }

    /// Institutional margin: weighted effectiveness of the governance
    /// modules, discounted when modules are inactive. An empty slice
    /// means no effective governance at all.
    pub fn institutional_margin(&self, modules: &[GovernanceModuleState]) -> f64 {
        if modules.is_empty() {
            return 0.0;
        }

        let capacity: f64 = modules
            .iter()
            .map(|m| m.effectiveness.clamp(0.0, 1.0) * module_weight(m.module))
            .sum();
        let active = modules.iter().filter(|m| m.active).count();
        let active_ratio = active as f64 / modules.len() as f64;

        (capacity * (0.5 + 0.5 * active_ratio)).clamp(0.0, 1.0)
    }

    /// Full assessment from this turn's final metrics plus the
    /// caller-supplied governance states and metric history.
    pub fn assess(
        &self,
        error_norm: f64,
        omega: f64,
        modules: &[GovernanceModuleState],
        history: &[MetricSnapshot],
    ) -> ViabilityState {
        let d_dyn = self.dynamic_margin(error_norm);
        let d_sem = self.semantic_margin(omega);
        let d_inst = self.institutional_margin(modules);
        self.from_margins(d_dyn, d_sem, d_inst, modules, history)
    }

    /// Classification from an explicit margin triple.
    pub fn from_margins(
        &self,
        d_dyn: f64,
        d_sem: f64,
        d_inst: f64,
        modules: &[GovernanceModuleState],
        history: &[MetricSnapshot],
    ) -> ViabilityState {
        let rld = d_dyn.min(d_sem).min(d_inst);
        let risk_tier = self.risk_tier(rld);

        let (mut transfer_risk, mut collapse_risk) = base_risks(risk_tier);

        // A sustained low reading weighs more than a single dip: if the
        // recent history's own margins were already below the stable
        // band, escalate both ordinal risks one step.
        if rld < self.config.rld_stable && self.sustained_low(history) {
            transfer_risk = transfer_risk.escalate();
            collapse_risk = collapse_risk.escalate();
        }

        let recommendations = self.recommendations(rld, modules);

        ViabilityState {
            d_dyn,
            d_sem,
            d_inst,
            rld,
            risk_tier,
            transfer_risk,
            collapse_risk,
            recommendations,
        }
    }

    fn risk_tier(&self, rld: f64) -> RiskTier {
        let c = &self.config;
        if rld >= c.rld_stable {
            RiskTier::Stable
        } else if rld >= c.rld_intervention {
            RiskTier::Degraded
        } else if rld >= c.rld_human_decision {
            RiskTier::InterventionRequired
        } else if rld >= c.rld_founder_decision {
            RiskTier::HumanDecisionRequired
        } else if rld >= c.rld_shutdown {
            RiskTier::FounderDecision
        } else {
            RiskTier::ShutdownSequence
        }
    }

    /// Whether the trailing history already sat below the stable band.
    ///
    /// Uses the dynamic and semantic margins reconstructible from each
    /// snapshot; the institutional margin has no history of its own.
    fn sustained_low(&self, history: &[MetricSnapshot]) -> bool {
        let start = history.len().saturating_sub(TREND_WINDOW);
        let recent = &history[start..];
        recent.len() >= 2
            && recent.iter().all(|s| {
                let margin = self
                    .dynamic_margin(s.error_norm)
                    .min(self.semantic_margin(s.omega));
                margin < self.config.rld_stable
            })
    }

    fn recommendations(&self, rld: f64, modules: &[GovernanceModuleState]) -> Vec<String> {
        let c = &self.config;
        let mut recs = Vec::new();

        if rld < c.rld_stable {
            recs.push(format!("RLD below stable threshold ({:.2})", c.rld_stable));
        }
        if rld < c.rld_intervention {
            recs.push("corrective intervention required".to_string());
        }
        if rld < c.rld_human_decision {
            recs.push("human decision required".to_string());
        }
        if rld < c.rld_founder_decision {
            recs.push("founder-level decision required".to_string());
        }
        if rld < c.rld_shutdown {
            recs.push("shutdown sequence tier reached".to_string());
        }

        for m in modules {
            if !m.active {
                recs.push(format!("governance module {:?} inactive", m.module));
            } else if m.effectiveness < 0.5 {
                recs.push(format!(
                    "governance module {:?} at low effectiveness ({:.0}%)",
                    m.module,
                    m.effectiveness * 100.0
                ));
            }
        }

        recs
    }
}

fn base_risks(tier: RiskTier) -> (TransferRisk, CollapseRisk) {
    match tier {
        RiskTier::Stable => (TransferRisk::None, CollapseRisk::None),
        RiskTier::Degraded => (TransferRisk::Low, CollapseRisk::Low),
        RiskTier::InterventionRequired => (TransferRisk::Medium, CollapseRisk::Medium),
        RiskTier::HumanDecisionRequired => (TransferRisk::High, CollapseRisk::High),
        RiskTier::FounderDecision => (TransferRisk::Critical, CollapseRisk::High),
        RiskTier::ShutdownSequence => (TransferRisk::Critical, CollapseRisk::Imminent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> ViabilityAssessor {
        ViabilityAssessor::new(OntoguardConfig::default())
    }

    fn full_governance() -> Vec<GovernanceModuleState> {
        [
            GovernanceModule::CostObserver,
            GovernanceModule::NormativeRegulator,
            GovernanceModule::SemanticMemory,
            GovernanceModule::AuditIntegrity,
        ]
        .into_iter()
        .map(|module| GovernanceModuleState {
            module,
            active: true,
            effectiveness: 1.0,
        })
        .collect()
    }

    fn snapshot(error_norm: f64, omega: f64) -> MetricSnapshot {
        MetricSnapshot {
            v: 0.5 * error_norm * error_norm,
            omega,
            error_norm,
            sigma_sem: 0.0,
            epsilon_eff: 0.0,
        }
    }

    // ── margins ───────────────────────────────────────────────────

    #[test]
    fn test_dynamic_margin_shrinks_with_error() {
        let a = assessor();
        assert_eq!(a.dynamic_margin(0.0), 1.0);
        assert!((a.dynamic_margin(0.25) - 0.75).abs() < 1e-9);
        assert_eq!(a.dynamic_margin(1.5), 0.0);
    }

    #[test]
    fn test_semantic_margin_shrinks_with_omega() {
        let a = assessor();
        assert_eq!(a.semantic_margin(1.0), 1.0);
        assert!((a.semantic_margin(0.7) - 0.5).abs() < 1e-9);
        assert_eq!(a.semantic_margin(0.4), 0.0);
        assert_eq!(a.semantic_margin(-0.8), 0.0);
    }

    #[test]
    fn test_institutional_margin_full_governance() {
        let a = assessor();
        let margin = a.institutional_margin(&full_governance());
        assert!((margin - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_institutional_margin_empty_is_zero() {
        assert_eq!(assessor().institutional_margin(&[]), 0.0);
    }

    #[test]
    fn test_institutional_margin_inactive_discount() {
        let a = assessor();
        let mut modules = full_governance();
        for m in &mut modules {
            m.active = false;
        }
        // Same effectiveness, nothing active: capacity * 0.5.
        assert!((a.institutional_margin(&modules) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_institutional_weights_favor_regulator() {
        let a = assessor();
        let regulator_only = [GovernanceModuleState {
            module: GovernanceModule::NormativeRegulator,
            active: true,
            effectiveness: 1.0,
        }];
        let observer_only = [GovernanceModuleState {
            module: GovernanceModule::CostObserver,
            active: true,
            effectiveness: 1.0,
        }];
        assert!(a.institutional_margin(&regulator_only) > a.institutional_margin(&observer_only));
    }

    // ── RLD aggregation ───────────────────────────────────────────

    #[test]
    fn test_rld_is_exact_min() {
        let a = assessor();
        let state = a.from_margins(0.8, 0.9, 1.0, &[], &[]);
        assert_eq!(state.rld, 0.8);
        let state = a.from_margins(0.9, 0.2, 1.0, &[], &[]);
        assert_eq!(state.rld, 0.2);
    }

    #[test]
    fn test_rld_in_unit_interval() {
        let a = assessor();
        for &(x, y, z) in &[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (0.3, 0.7, 0.5)] {
            let state = a.from_margins(x, y, z, &[], &[]);
            assert!((0.0..=1.0).contains(&state.rld));
        }
    }

    #[test]
    fn test_stable_tier_scenario() {
        // d_dyn=0.8, d_sem=0.9, d_inst=1.0 → RLD=0.8 → stable.
        let state = assessor().from_margins(0.8, 0.9, 1.0, &[], &[]);
        assert_eq!(state.rld, 0.8);
        assert_eq!(state.risk_tier, RiskTier::Stable);
        assert_eq!(state.transfer_risk, TransferRisk::None);
        assert!(state.recommendations.is_empty());
    }

    #[test]
    fn test_collapsed_institutional_margin_dominates() {
        // Two high margins cannot mask a collapsed third.
        let state = assessor().from_margins(0.9, 0.9, 0.02, &[], &[]);
        assert_eq!(state.rld, 0.02);
        assert_eq!(state.risk_tier, RiskTier::ShutdownSequence);
        assert_eq!(state.collapse_risk, CollapseRisk::Imminent);
        assert!(state
            .recommendations
            .iter()
            .any(|r| r.contains("shutdown sequence")));
    }

    #[test]
    fn test_tier_boundaries() {
        let a = assessor();
        assert_eq!(a.from_margins(0.7, 1.0, 1.0, &[], &[]).risk_tier, RiskTier::Stable);
        assert_eq!(a.from_margins(0.6, 1.0, 1.0, &[], &[]).risk_tier, RiskTier::Degraded);
        assert_eq!(
            a.from_margins(0.45, 1.0, 1.0, &[], &[]).risk_tier,
            RiskTier::InterventionRequired
        );
        assert_eq!(
            a.from_margins(0.2, 1.0, 1.0, &[], &[]).risk_tier,
            RiskTier::HumanDecisionRequired
        );
        assert_eq!(
            a.from_margins(0.1, 1.0, 1.0, &[], &[]).risk_tier,
            RiskTier::FounderDecision
        );
        assert_eq!(
            a.from_margins(0.04, 1.0, 1.0, &[], &[]).risk_tier,
            RiskTier::ShutdownSequence
        );
    }

    // ── trend-aware risk classification ──────────────────────────

    #[test]
    fn test_single_dip_not_escalated() {
        let a = assessor();
        // Healthy history, one low turn now.
        let history = vec![snapshot(0.1, 0.95), snapshot(0.1, 0.95)];
        let state = a.from_margins(0.4, 0.9, 1.0, &[], &history);
        assert_eq!(state.risk_tier, RiskTier::InterventionRequired);
        assert_eq!(state.transfer_risk, TransferRisk::Medium);
    }

    #[test]
    fn test_sustained_low_escalates_one_step() {
        let a = assessor();
        // Recent history already below the stable band.
        let history = vec![snapshot(0.8, 0.5), snapshot(0.85, 0.45), snapshot(0.9, 0.5)];
        let state = a.from_margins(0.4, 0.9, 1.0, &[], &history);
        assert_eq!(state.transfer_risk, TransferRisk::High);
        assert_eq!(state.collapse_risk, CollapseRisk::High);
    }

    #[test]
    fn test_stable_rld_never_escalated_by_history() {
        let a = assessor();
        let history = vec![snapshot(0.9, 0.4), snapshot(0.9, 0.4)];
        let state = a.from_margins(0.9, 0.9, 0.95, &[], &history);
        assert_eq!(state.transfer_risk, TransferRisk::None);
    }

    // ── recommendations ───────────────────────────────────────────

    #[test]
    fn test_recommendations_accumulate_with_depth() {
        let state = assessor().from_margins(0.1, 1.0, 1.0, &[], &[]);
        assert!(state.recommendations.len() >= 4);
        assert!(state.recommendations[0].contains("stable threshold"));
    }

    #[test]
    fn test_weak_module_flagged() {
        let modules = [GovernanceModuleState {
            module: GovernanceModule::AuditIntegrity,
            active: true,
            effectiveness: 0.3,
        }];
        let state = assessor().assess(0.1, 0.95, &modules, &[]);
        assert!(state
            .recommendations
            .iter()
            .any(|r| r.contains("AuditIntegrity") && r.contains("30%")));
    }

    #[test]
    fn test_inactive_module_flagged() {
        let mut modules = full_governance();
        modules[1].active = false;
        let state = assessor().assess(0.1, 0.95, &modules, &[]);
        assert!(state
            .recommendations
            .iter()
            .any(|r| r.contains("NormativeRegulator") && r.contains("inactive")));
    }

    #[test]
    fn test_assess_end_to_end_healthy() {
        let state = assessor().assess(0.1, 0.95, &full_governance(), &[]);
        assert_eq!(state.risk_tier, RiskTier::Stable);
        assert!(state.rld >= 0.7);
    }
}
