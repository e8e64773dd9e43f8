//! Pomolog CLI library.
//!
//! This crate provides the CLI interface for the session log analytics.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
