//! Core types for the stepwise library
//!
//! - Scenario: validated scenario documents and their steps
//! - State: per-user dialogue cursor
//! - Event: user input fed to the interpreter
//! - Output: render instructions and transition outcomes

pub mod event;
pub mod output;
pub mod scenario;
pub mod state;

pub use event::Event;
pub use output::{Affordance, NoOpReason, Outcome, Preface, RenderInstruction, Transition};
pub use scenario::{BranchOption, InputOption, ScenarioDocument, Step, StepKind};
pub use state::{DialogueState, PendingTransition};
