// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Control Action Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Which corrective mission the supervisor applied this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    /// Neither trigger fired; candidate passes through unmodified.
    None,
    /// ||e(t)|| exceeded the stability radius: realign toward the reference.
    Position,
    /// Sustained semantic drainage: reassert affirmative structure.
    Structure,
    /// Both triggers fired simultaneously.
    Combined,
}

/// Outcome of the supervisor's decision for one turn.
///
/// Produced exactly once per turn and returned to the caller, who is
/// responsible for persistence and the audit-ledger append.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlAction {
    pub control_type: ControlType,
    /// The message to emit: either the rewrite or, on fallback, the
    /// original candidate response.
    pub controlled_message: String,
    /// Control magnitude in [0, 1].
    pub magnitude: f64,
    /// Human-readable justification citing the numeric trigger values.
    pub reasoning: String,
}

impl ControlAction {
    /// Passthrough action when no control is needed.
    pub fn none(candidate: impl Into<String>) -> Self {
        Self {
            control_type: ControlType::None,
            controlled_message: candidate.into(),
            magnitude: 0.0,
            reasoning: "system stable, no semantic drainage".to_string(),
        }
    }

    /// Whether the supervisor modified the candidate this turn.
    pub fn intervened(&self) -> bool {
        self.control_type != ControlType::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_action_passthrough() {
        let action = ControlAction::none("original text");
        assert_eq!(action.control_type, ControlType::None);
        assert_eq!(action.controlled_message, "original text");
        assert_eq!(action.magnitude, 0.0);
        assert!(!action.intervened());
    }

    #[test]
    fn test_serde_tags_lowercase() {
        let json = serde_json::to_string(&ControlType::Combined).unwrap();
        assert_eq!(json, "\"combined\"");
    }
}
