//! What the interpreter hands back to the transport

use serde::{Deserialize, Serialize};

use super::state::DialogueState;

/// Transport-agnostic description of one message to present
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderInstruction {
    /// Something to show before the main text
    pub preface: Option<Preface>,
    /// Main message body
    pub text: String,
    /// Image reference passed through untouched
    pub photo: Option<String>,
    /// How the user may respond
    pub affordance: Affordance,
    /// Step the instruction was built from, if any
    pub step_index: Option<usize>,
}

impl RenderInstruction {
    pub fn new(text: impl Into<String>, affordance: Affordance) -> Self {
        Self {
            preface: None,
            text: text.into(),
            photo: None,
            affordance,
            step_index: None,
        }
    }

    pub fn with_preface(mut self, preface: Option<Preface>) -> Self {
        self.preface = preface;
        self
    }

    /// Check if the user is expected to type rather than press a button
    pub fn expects_text(&self) -> bool {
        matches!(self.affordance, Affordance::FreeText { .. })
    }
}

/// Interaction offered alongside a rendered message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Affordance {
    /// Nothing to press, e.g. a final screen
    None,
    /// Single button that advances to the next step
    Advance { label: Option<String> },
    /// Single button that completes a pending branch
    Continue { label: Option<String> },
    /// Answer buttons of a practice or survey step
    Choices { choices: Vec<String> },
    /// Option buttons of a branch step
    Options { labels: Vec<String> },
    /// Free text is expected
    FreeText { placeholder: Option<String> },
}

/// Content shown before the main text of an instruction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Preface {
    /// Authored response of the chosen branch option
    Response(String),
    /// The previous practice answer was correct
    CorrectAnswer,
    /// Free text was received
    AnswerReceived,
}

/// Why an event was ignored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoOpReason {
    /// Index or choice does not exist on the current step
    StaleEvent,
    /// Event kind does not fit what the current step expects
    UnexpectedEvent,
    /// User has no scenario running
    NoActiveScenario,
}

/// Result of feeding one event to the interpreter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Outcome {
    /// Present this instruction
    Render(RenderInstruction),
    /// Practice answer was wrong; nothing changed
    Incorrect { step_index: usize },
    /// Event was ignored; reprompt at the transport's discretion
    NoOp(NoOpReason),
    /// Scenario finished; the caller discards the dialogue state
    Complete { preface: Option<Preface> },
}

impl Outcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete { .. })
    }

    pub fn instruction(&self) -> Option<&RenderInstruction> {
        match self {
            Outcome::Render(instruction) => Some(instruction),
            _ => None,
        }
    }
}

/// Replacement state plus outcome of one interpreter call
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// `None` means the state must be cleared
    pub state: Option<DialogueState>,
    pub outcome: Outcome,
}

impl Transition {
    pub fn keep(state: &DialogueState, outcome: Outcome) -> Self {
        Self {
            state: Some(state.clone()),
            outcome,
        }
    }
}
