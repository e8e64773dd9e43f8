//! Line-oriented session log parsing.
//!
//! The timer process appends one record per line:
//!
//! ```text
//! 2025-11-14 11:48:34 | work | completed | duration=1500 | cycle=2 | tag=api
//! ```
//!
//! Parsing is tolerant by contract. Lines that fail the outer grammar or
//! carry an unparsable timestamp are counted as malformed and skipped,
//! never raised. Failures inside the optional `key=value` tail degrade to
//! defaults without marking the line malformed. Only I/O errors on an
//! existing file surface as errors; a missing file is a valid empty log.
//!
//! The log is read line-buffered in one pass. A partially written last
//! line (writer mid-append) shows up as one malformed line until the
//! writer finishes it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use thiserror::Error;

use crate::session::SessionEntry;

/// Outer grammar for one line: `timestamp | type | status [| extra]`.
///
/// The type and status must be single word tokens, the timestamp is any
/// non-pipe text, and everything after the third pipe is captured as one
/// opaque tail for the `key=value` stage. A third pipe with nothing after
/// it fails the match.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<timestamp>[^|]+?)\s*\|\s*(?P<session_type>\w+)\s*\|\s*(?P<status>\w+)(?:\s*\|\s*(?P<extra>.+))?$",
    )
    .unwrap()
});

/// Timestamp formats tried after the ISO 8601 parse.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Errors from reading the session log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Field slices of a line that matched the outer grammar.
#[derive(Debug, PartialEq, Eq)]
struct RawLine<'a> {
    timestamp: &'a str,
    session_type: &'a str,
    status: &'a str,
    extra: Option<&'a str>,
}

/// First stage: match a stripped line against the outer grammar.
///
/// Returns `None` for anything that does not fit; the caller counts those
/// as malformed.
fn match_line(line: &str) -> Option<RawLine<'_>> {
    let caps = LINE_RE.captures(line)?;
    Some(RawLine {
        timestamp: caps.name("timestamp")?.as_str(),
        session_type: caps.name("session_type")?.as_str(),
        status: caps.name("status")?.as_str(),
        extra: caps.name("extra").map(|m| m.as_str()),
    })
}

/// Second stage: parse the timestamp field.
///
/// A trailing `Z` is stripped and the remainder treated as naive
/// wall-clock time, and an RFC 3339 numeric offset is dropped the same
/// way, keeping the clock time as written; no UTC conversion happens in
/// either case. The ISO 8601 form is tried first, then each entry of
/// [`TIMESTAMP_FORMATS`], then the offset form. First success wins.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let raw = raw.strip_suffix('Z').unwrap_or(raw);

    if let Ok(ts) = raw.parse::<NaiveDateTime>() {
        return Some(ts);
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.naive_local())
        })
}

/// Optional fields recovered from the extra tail.
///
/// The recognized key set is closed: `duration`, `cycle`, `tag`.
#[derive(Debug, Default, PartialEq, Eq)]
struct ExtraFields {
    duration_seconds: i64,
    cycle: Option<i64>,
    tag: Option<String>,
}

/// Third stage: scan the extra tail for `key=value` segments.
///
/// Segments are split on `|`. A segment without `=`, with an unrecognized
/// key, or with an unparsable numeric value is ignored; a repeated key
/// overwrites the earlier value when its own parse succeeds.
fn parse_extra_fields(extra: &str) -> ExtraFields {
    let mut fields = ExtraFields::default();

    for segment in extra.split('|') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        match (key.trim(), value.trim()) {
            ("duration", value) => {
                if let Ok(seconds) = value.parse() {
                    fields.duration_seconds = seconds;
                }
            }
            ("cycle", value) => {
                if let Ok(cycle) = value.parse() {
                    fields.cycle = Some(cycle);
                }
            }
            ("tag", value) => fields.tag = Some(value.to_string()),
            _ => {}
        }
    }

    fields
}

/// Parses the session log at `path`.
///
/// Returns the well-formed entries in input order together with the count
/// of malformed lines. A missing file is an empty log, not an error.
pub fn parse_log_file(path: &Path) -> Result<(Vec<SessionEntry>, usize), LogError> {
    if !path.exists() {
        return Ok((Vec::new(), 0));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    let mut malformed = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(raw) = match_line(line) else {
            tracing::debug!(line = index + 1, "skipping line that fails the grammar");
            malformed += 1;
            continue;
        };

        let Some(timestamp) = parse_timestamp(raw.timestamp) else {
            tracing::debug!(
                line = index + 1,
                timestamp = raw.timestamp,
                "skipping line with unparsable timestamp"
            );
            malformed += 1;
            continue;
        };

        let extras = raw.extra.map(parse_extra_fields).unwrap_or_default();

        entries.push(SessionEntry {
            timestamp,
            session_type: raw.session_type.to_string(),
            status: raw.status.to_string(),
            duration_seconds: extras.duration_seconds,
            cycle: extras.cycle,
            tag: extras.tag,
        });
    }

    Ok((entries, malformed))
}
