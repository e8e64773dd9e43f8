//! CLI subcommand implementations.

pub mod stats;
