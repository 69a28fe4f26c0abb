//! Infrastructure layer - concrete collaborators for the engine
//!
//! File-system and in-memory repositories, access policies, and the natural
//! ordering used for scenario listings.

pub mod access;
pub mod repositories;
pub mod sorting;

pub use access::{AllowList, AllowListData, OpenAccess};
pub use repositories::{
    FileSystemScenarioRepository, InMemoryDialogueStore, InMemoryScenarioRepository,
    JsonFileDialogueStore,
};
