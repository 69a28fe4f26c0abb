//! Scenario document model
//!
//! A scenario is an ordered list of steps loaded from a JSON file. Documents are
//! only ever built by the validator in [`crate::parser`], so every value of these
//! types upholds the structural invariants checked there.
//!
//! Serializing a document produces the authoring format again, which makes
//! `parse(serialize(doc)) == doc` hold for every validated document.

use serde::{Deserialize, Serialize};

/// A validated, immutable scenario
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScenarioDocument {
    /// Identifier the scenario was loaded under (the file stem)
    #[serde(skip)]
    pub id: String,
    /// Human readable name shown in menus
    #[serde(rename = "name")]
    pub display_name: String,
    /// Steps in presentation order, never empty
    pub steps: Vec<Step>,
}

impl ScenarioDocument {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            steps,
        }
    }

    pub fn get_step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// One unit of interaction within a scenario
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub text: String,
    /// Opaque image reference, resolved by the transport
    #[serde(rename = "photo", default, skip_serializing_if = "Option::is_none")]
    pub photo_ref: Option<String>,
    /// Caption override for the advance / continue button
    #[serde(rename = "button_text", default, skip_serializing_if = "Option::is_none")]
    pub button_label: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_final: bool,
    #[serde(flatten)]
    pub kind: StepKind,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Step {
    pub fn new(text: impl Into<String>, kind: StepKind) -> Self {
        Self {
            text: text.into(),
            photo_ref: None,
            button_label: None,
            is_final: false,
            kind,
        }
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo_ref = Some(photo.into());
        self
    }

    pub fn with_button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = Some(label.into());
        self
    }

    pub fn final_step(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// Kind-specific payload of a step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Plain information screen with a single advance button
    Theory,
    /// Multiple choice question with exactly one correct answer
    Practice {
        #[serde(rename = "buttons")]
        choices: Vec<String>,
        #[serde(rename = "correct_answer")]
        correct_choice: String,
    },
    /// Free text prompt, any answer is accepted
    TextAnswer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Decision point whose options reply and then repeat, pause or advance
    Branch { options: Vec<BranchOption> },
    /// Decision point whose options ask for free text before advancing
    BranchWithInput { options: Vec<InputOption> },
    /// Question without a correct answer
    Survey {
        #[serde(rename = "buttons")]
        choices: Vec<String>,
    },
}

impl StepKind {
    /// Tag used for this kind in the authoring format
    pub fn tag(&self) -> &'static str {
        match self {
            StepKind::Theory => "theory",
            StepKind::Practice { .. } => "practice",
            StepKind::TextAnswer { .. } => "text_answer",
            StepKind::Branch { .. } => "branch",
            StepKind::BranchWithInput { .. } => "branch_with_input",
            StepKind::Survey { .. } => "survey",
        }
    }

    /// All tags accepted by the validator
    pub const TAGS: [&'static str; 6] = [
        "theory",
        "practice",
        "text_answer",
        "branch",
        "branch_with_input",
        "survey",
    ];
}

/// An option of a `branch` step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchOption {
    #[serde(rename = "text")]
    pub label: String,
    pub response: String,
    /// Show the same step again after the response
    #[serde(default)]
    pub repeat_step: bool,
    /// Wait for an explicit continue before moving on
    #[serde(default = "default_true")]
    pub show_continue_button: bool,
}

fn default_true() -> bool {
    true
}

impl BranchOption {
    pub fn new(label: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            response: response.into(),
            repeat_step: false,
            show_continue_button: true,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat_step = true;
        self
    }

    pub fn without_continue(mut self) -> Self {
        self.show_continue_button = false;
        self
    }
}

/// An option of a `branch_with_input` step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputOption {
    #[serde(rename = "text")]
    pub label: String,
    pub input_prompt: String,
}

impl InputOption {
    pub fn new(label: impl Into<String>, input_prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            input_prompt: input_prompt.into(),
        }
    }
}
