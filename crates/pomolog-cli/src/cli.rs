//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pomodoro session log analytics.
///
/// Reads the append-only log written by the timer and computes productivity
/// statistics: per-kind session counts, focus time, streaks, and cycle
/// estimates.
#[derive(Debug, Parser)]
#[command(name = "pomolog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute statistics from the session log.
    Stats {
        /// Path to the session log (overrides the configured path).
        #[arg(long)]
        log: Option<PathBuf>,

        /// Print the summary as JSON instead of the formatted report.
        #[arg(long)]
        json: bool,
    },
}
