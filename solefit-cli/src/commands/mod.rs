//! CLI subcommand implementations.

pub mod common;
pub mod fetch;
pub mod handoff;
pub mod probe;
pub mod report;

/// Command result type: errors print at the top level and set the exit code.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;
