//! Functionality shared by the types-harness crates: structured logging and JSON helpers.

pub mod logging;
pub mod utils;
