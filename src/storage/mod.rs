//! Storage module for saving and loading dialogue state
//!
//! This module provides save/load functionality using JSON serialization.

use crate::types::state::DialogueState;

/// Save state to bytes using JSON serialization
pub fn save(state: &DialogueState) -> anyhow::Result<Vec<u8>> {
    let json = serde_json::to_string_pretty(state)?;
    Ok(json.into_bytes())
}

/// Load state from bytes using JSON deserialization
pub fn load(bytes: &[u8]) -> anyhow::Result<DialogueState> {
    let json = std::str::from_utf8(bytes)?;
    let state = serde_json::from_str(json)?;
    Ok(state)
}
