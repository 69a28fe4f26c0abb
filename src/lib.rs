//! # stepwise
//!
//! An interpreter for branching dialogue scenarios authored as JSON. A scenario
//! is an ordered list of steps (theory, practice, text answer, branch, branch
//! with input, survey). Each user holds a small cursor into one scenario, and
//! every incoming event is turned into a new cursor plus a transport-agnostic
//! render instruction.
//!
//! ## Quick Start
//!
//! ```rust
//! use stepwise::{parse_scenario, runtime, Event, Outcome};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = r#"{
//!   "name": "Intro",
//!   "steps": [
//!     {"type": "theory", "text": "Welcome"},
//!     {"type": "practice", "text": "2 + 2?", "buttons": ["3", "4"], "correct_answer": "4"}
//!   ]
//! }"#;
//! let doc = parse_scenario("intro", json)?;
//!
//! let started = runtime::start(&doc);
//! let state = started.state.expect("scenario started");
//!
//! let next = runtime::step(&state, &doc, &Event::Advance);
//! let state = next.state.expect("still running");
//! assert_eq!(state.step_index, 1);
//!
//! let done = runtime::step(&state, &doc, &Event::Choose("4".to_string()));
//! assert!(matches!(done.outcome, Outcome::Complete { .. }));
//! assert!(done.state.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! For multi-user sessions use [`application::DialogueEngine`], which pairs the
//! interpreter with a scenario repository and a dialogue store.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod parser;
pub mod runtime;
pub mod storage;
pub mod transport;
pub mod types;

pub use application::DialogueEngine;
pub use config::EngineConfig;
pub use domain::errors::{EngineError, LoadError, StoreError, ValidationError};
pub use domain::value_objects::{ScenarioId, UserId};
pub use parser::parse as parse_scenario;
pub use runtime::step;
pub use types::{
    Affordance, DialogueState, Event, NoOpReason, Outcome, Preface, RenderInstruction,
    ScenarioDocument, Step, StepKind,
};
