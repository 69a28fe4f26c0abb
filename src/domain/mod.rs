//! Domain layer - errors, identifiers and the collaborator contracts
//!
//! The interpreter itself lives in [`crate::runtime`] and performs no I/O;
//! everything it needs from the outside world is described here as a trait.

pub mod errors;
pub mod repositories;
pub mod value_objects;
