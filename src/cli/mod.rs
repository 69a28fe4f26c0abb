//! Command-line transport: interactive play, listing and checking scenarios

pub mod check;
pub mod play;
