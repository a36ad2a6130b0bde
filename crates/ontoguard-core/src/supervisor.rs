// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Control Supervisor (Position + Structure Injection)
// ─────────────────────────────────────────────────────────────────────
//! Decides whether a candidate response needs correction and drives
//! the rewrite.
//!
//! Two independent, non-exclusive triggers:
//!   - **Position control**: ||e(t)|| exceeded the stability radius ε;
//!     realign the response toward the reference ontology.
//!   - **Structure injection**: ε_eff and σ_sem are both below the
//!     injection threshold, sustained semantic drainage rather than a
//!     transient dip; strip corrosive negation and reassert
//!     affirmative structural claims.
//!
//! The supervisor holds no per-session state; its decision is a pure
//! function of the context, except for the one generation call when a
//! correction is needed. That call fails open: the turn never aborts
//! because a rewrite failed.

use std::sync::Arc;

use ontoguard_types::{ControlAction, ControlType, OntoguardConfig, ReferenceOntology};

use crate::providers::{ChatMessage, GenerationProvider};

/// Read-only input to one control decision.
#[derive(Debug, Clone)]
pub struct ControlContext {
    /// Current error magnitude ||e(t)||.
    pub error_magnitude: f64,
    /// Stability radius ε.
    pub stability_radius: f64,
    /// Effective field ε_eff = Ω·σ_sem.
    pub epsilon_eff: f64,
    /// Semantic polarity σ_sem.
    pub sigma_sem: f64,
    /// Coherence Ω.
    pub omega: f64,
    pub ontology: ReferenceOntology,
    /// The triggering operator message.
    pub user_message: String,
    /// The candidate response under audit.
    pub plant_response: String,
}

/// Which triggers fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTriggers {
    pub needs_position: bool,
    pub needs_structure: bool,
}

impl ControlTriggers {
    pub fn control_type(&self) -> ControlType {
        match (self.needs_position, self.needs_structure) {
            (false, false) => ControlType::None,
            (true, false) => ControlType::Position,
            (false, true) => ControlType::Structure,
            (true, true) => ControlType::Combined,
        }
    }
}

/// Evaluate both triggers. Independent and non-exclusive.
pub fn requires_control(context: &ControlContext, injection_threshold: f64) -> ControlTriggers {
    ControlTriggers {
        needs_position: context.error_magnitude > context.stability_radius,
        needs_structure: context.epsilon_eff < injection_threshold
            && context.sigma_sem < injection_threshold,
    }
}

/// The control supervisor.
pub struct ControlSupervisor {
    generation: Arc<dyn GenerationProvider>,
    config: OntoguardConfig,
}

impl ControlSupervisor {
    pub fn new(generation: Arc<dyn GenerationProvider>, config: OntoguardConfig) -> Self {
        Self { generation, config }
    }

    /// Decide and apply control for one turn. Always returns a
    /// well-formed action; generation failures degrade to the original
    /// candidate rather than erroring.
    pub fn apply(&self, context: &ControlContext) -> ControlAction {
        let triggers = requires_control(context, self.config.structure_injection_threshold);
        let control_type = triggers.control_type();

        if control_type == ControlType::None {
            return ControlAction::none(context.plant_response.clone());
        }

        let magnitude = self.magnitude(context, control_type);
        let mut reasoning = reasoning_message(context, control_type);

        let controlled_message = match self.generate_rewrite(context, control_type) {
            Ok(text) => text,
            Err(reason) => {
                log::error!("corrective rewrite failed, falling back to candidate: {reason}");
                reasoning.push_str("; generation unavailable, fallback to uncontrolled candidate");
                context.plant_response.clone()
            }
        };

        ControlAction {
            control_type,
            controlled_message,
            magnitude,
            reasoning,
        }
    }

    /// Call the generation collaborator for the rewrite. Empty or
    /// whitespace-only output counts as failure.
    fn generate_rewrite(
        &self,
        context: &ControlContext,
        control_type: ControlType,
    ) -> Result<String, String> {
        let messages = build_rewrite_instruction(context, control_type);
        match self
            .generation
            .generate(&messages, self.config.generation_timeout_ms)
        {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => Err("empty output".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    fn magnitude(&self, context: &ControlContext, control_type: ControlType) -> f64 {
        let position = (context.error_magnitude / context.stability_radius).min(1.0);
        let structure = context.epsilon_eff.abs().min(1.0);
        match control_type {
            ControlType::None => 0.0,
            ControlType::Position => position,
            ControlType::Structure => structure,
            ControlType::Combined => position.max(structure),
        }
    }
}

/// Build the rewrite conversation: ontology, current metrics, and the
/// mission text for the trigger that fired.
fn build_rewrite_instruction(
    context: &ControlContext,
    control_type: ControlType,
) -> Vec<ChatMessage> {
    let mut prompt = format!(
        "You are the control supervisor in a coupled cognitive system.\n\n\
         ONTOLOGICAL CONTEXT:\n\
         - Purpose: {}\n\
         - Limits: {}\n\
         - Ethics: {}\n\n\
         CURRENT STATE:\n\
         - Cognitive error: ||e(t)|| = {:.3}\n\
         - Effective field: eps_eff = {:.3}\n\
         - Semantic polarity: sigma_sem = {:.3}\n\n\
         CONTROL MISSION: ",
        context.ontology.purpose,
        context.ontology.limits,
        context.ontology.ethics,
        context.error_magnitude,
        context.epsilon_eff,
        context.sigma_sem,
    );

    match control_type {
        ControlType::Position => prompt.push_str(
            "\nPOSITION REGULATION\n\
             The system has drifted from the attractor. Correct the response to:\n\
             - realign with the ontological purpose\n\
             - reduce conceptual drift\n\
             - stay coherent with the established limits",
        ),
        ControlType::Structure => prompt.push_str(
            "\nSTRUCTURE INJECTION\n\
             Semantic drainage detected: the discourse is eroding the ontological base.\n\
             Transform the response to:\n\
             - remove cynicism, corrosive irony, and negations without alternative\n\
             - inject affirmative propositions and base axioms\n\
             - rebuild conceptual foundations",
        ),
        ControlType::Combined => prompt.push_str(
            "\nCOMBINED CONTROL (CRITICAL)\n\
             The system shows positional drift AND semantic drainage simultaneously.\n\
             Apply dual control:\n\
             1. realign with the attractor (position)\n\
             2. inject structure to stop ontological erosion",
        ),
        ControlType::None => {}
    }

    prompt.push_str(&format!(
        "\n\nOPERATOR MESSAGE:\n\"{}\"\n\n\
         PROPOSED RESPONSE (UNCONTROLLED):\n\"{}\"\n\n\
         INSTRUCTIONS:\n\
         - modify the response to apply the specified control\n\
         - keep a natural conversational tone and style\n\
         - do NOT mention the control or any technical terms\n\
         - the response must read organically, not robotically\n\
         - keep a similar length to the original response",
        context.user_message, context.plant_response,
    ));

    vec![
        ChatMessage::system(prompt),
        ChatMessage::user("Generate the controlled response:"),
    ]
}

fn reasoning_message(context: &ControlContext, control_type: ControlType) -> String {
    match control_type {
        ControlType::Position => format!(
            "position control: ||e|| = {:.3} > eps = {:.3}",
            context.error_magnitude, context.stability_radius
        ),
        ControlType::Structure => format!(
            "structure injection: eps_eff = {:.3}, sigma_sem = {:.3} (semantic drainage)",
            context.epsilon_eff, context.sigma_sem
        ),
        ControlType::Combined => format!(
            "combined control: positional drift (||e|| = {:.3}) + semantic drainage (eps_eff = {:.3})",
            context.error_magnitude, context.epsilon_eff
        ),
        ControlType::None => "system stable, no semantic drainage".to_string(),
    }
}
