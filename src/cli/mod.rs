//! CLI subcommand implementations for the boardlift binary.

pub mod harvest_cmd;
pub mod output;
pub mod show_cmd;
pub mod solve_cmd;
