//! Application layer - the session-level engine transports talk to

pub mod engine;

pub use engine::DialogueEngine;
