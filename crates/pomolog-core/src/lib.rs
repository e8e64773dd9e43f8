//! Core domain logic for pomolog.
//!
//! This crate contains the read-only analytics pipeline:
//! - Parsing: the append-only session log into ordered entries plus a
//!   malformed-line count
//! - Aggregation: entries plus a caller-supplied reference instant into
//!   the summary document
//!
//! Nothing here reads the clock or keeps state between calls; the same
//! log bytes and the same `now` always produce the same summary.

pub mod parser;
pub mod session;
pub mod stats;

pub use parser::{LogError, parse_log_file};
pub use session::{SessionEntry, SessionKind, SessionStatus};
pub use stats::{
    Averages, Cycles, DateScope, FocusMetrics, KindTotals, SessionTotals, Streaks, Summary,
    compute_stats, generate_stats,
};
