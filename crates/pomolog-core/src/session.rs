//! Session log records and the token vocabulary the aggregator recognizes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Session kinds that participate in typed aggregation.
///
/// The log format itself is open-ended: any word token is accepted as a
/// session type and kept verbatim on the entry. Only these three kinds are
/// counted in the per-type totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Self::Work),
            "short_break" => Ok(Self::ShortBreak),
            "long_break" => Ok(Self::LongBreak),
            _ => Err(format!("unrecognized session type: {s}")),
        }
    }
}

/// Session outcomes that participate in aggregation.
///
/// A completed session contributes its duration to the totals; a skipped
/// one only bumps the skip counter. Any other status token rides along on
/// the entry without affecting either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Completed,
    Skipped,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(format!("unrecognized session status: {s}")),
        }
    }
}

/// One parsed record from the session log.
///
/// The `session_type` and `status` tokens are kept as raw strings so that
/// entries the aggregator does not recognize still survive parsing and
/// count toward the entry total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    /// When the session was recorded. Naive wall-clock time; a trailing
    /// `Z` in the log is stripped, not converted.
    pub timestamp: NaiveDateTime,
    /// Raw session type token, e.g. `work` or `short_break`.
    pub session_type: String,
    /// Raw status token, e.g. `completed` or `skipped`.
    pub status: String,
    /// Session length in seconds; 0 when the line carried none.
    #[serde(default)]
    pub duration_seconds: i64,
    /// Position within the 4-session cycle, when the writer recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<i64>,
    /// Free-form label, when the writer recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SessionEntry {
    /// True when this entry is a completed work session, the unit every
    /// focus metric is built from.
    #[must_use]
    pub fn is_completed_work(&self) -> bool {
        matches!(self.session_type.parse(), Ok(SessionKind::Work))
            && matches!(self.status.parse(), Ok(SessionStatus::Completed))
    }
}
