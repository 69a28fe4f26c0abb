//! Per-user dialogue cursor

use serde::{Deserialize, Serialize};

/// Where a user currently is inside a scenario
///
/// Values are never mutated by the interpreter; every accepted transition
/// returns a replacement state instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DialogueState {
    /// Scenario the cursor points into
    pub scenario_id: String,
    /// Index of the step currently shown
    pub step_index: usize,
    /// Deferred advance started by a branch option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingTransition>,
}

impl DialogueState {
    /// Fresh cursor at the first step
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            step_index: 0,
            pending: None,
        }
    }

    pub fn at_step(&self, step_index: usize) -> Self {
        Self {
            scenario_id: self.scenario_id.clone(),
            step_index,
            pending: None,
        }
    }

    pub fn with_pending(&self, pending: PendingTransition) -> Self {
        Self {
            scenario_id: self.scenario_id.clone(),
            step_index: self.step_index,
            pending: Some(pending),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Check that the cursor still points into a scenario of `steps` steps
    ///
    /// A saved cursor always rests on an existing step; only a pending
    /// transition may target the position just past the end.
    pub fn fits(&self, steps: usize) -> bool {
        self.step_index < steps
            && self
                .pending
                .is_none_or(|pending| pending.next_step() <= steps)
    }
}

/// Intermediate sub-state spanning two user turns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingTransition {
    /// A branch response was shown; waiting for the continue button
    AwaitingBranchContinue { next_step: usize },
    /// An input prompt was shown; waiting for any free text
    AwaitingBranchInput { next_step: usize },
}

impl PendingTransition {
    pub fn next_step(&self) -> usize {
        match self {
            PendingTransition::AwaitingBranchContinue { next_step }
            | PendingTransition::AwaitingBranchInput { next_step } => *next_step,
        }
    }
}
