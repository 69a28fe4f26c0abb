//! User events fed into the interpreter

use serde::{Deserialize, Serialize};

/// Inbound user event, already decoded from whatever the transport received
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Event {
    /// The advance button of a theory step was pressed
    Advance,
    /// A practice or survey answer was picked by its text
    Choose(String),
    /// An option was picked by its position
    SelectOption(usize),
    /// Free text typed by the user
    TextInput(String),
    /// The continue button shown after a branch response was pressed
    Continue,
}

impl Event {
    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Event::Advance => "advance",
            Event::Choose(_) => "choose",
            Event::SelectOption(_) => "select_option",
            Event::TextInput(_) => "text_input",
            Event::Continue => "continue",
        }
    }
}
