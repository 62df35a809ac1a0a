//! Command handlers for the AgriHelp CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod seed;
pub mod serve;
pub mod stats;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use seed::SeedCommand;
pub use serve::ServeCommand;
pub use stats::StatsCommand;
