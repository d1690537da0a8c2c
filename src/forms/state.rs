//! Per-step state machine for multi-page onboarding forms.

use serde::{Deserialize, Serialize};

/// Where the user is within one onboarding step.
///
/// `Editing` loops back to itself on validation failure. A valid first
/// submission moves to `Reviewing` (check your answers); the user can go
/// back to `Editing` or confirm into the terminal `Complete` state, at
/// which point the account-level setup flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Editing,
    Reviewing,
    Complete,
}

impl StepState {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: StepState) -> bool {
        use StepState::*;
        matches!(
            (self, target),
            (Editing, Editing) | (Editing, Reviewing) | (Reviewing, Editing) | (Reviewing, Complete)
        )
    }

    /// Whether this state is terminal (the step is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for StepState {
    fn default() -> Self {
        Self::Editing
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editing => "editing",
            Self::Reviewing => "reviewing",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}
