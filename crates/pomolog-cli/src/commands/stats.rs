//! Stats command for summarizing the session log.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use pomolog_core::{Summary, generate_stats};

/// Error document emitted on stdout in JSON mode when the pipeline fails.
///
/// Matches the envelope an HTTP front end returns for the same failure, so
/// scripted consumers can key off `error_code` either way.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    status: &'static str,
    error_code: &'static str,
    message: String,
}

/// Runs the stats command against the log at `log_path`.
pub fn run<W: Write>(writer: &mut W, log_path: &Path, json: bool) -> Result<()> {
    // One clock read per invocation; every date window in the summary
    // derives from this instant.
    let now = Local::now().naive_local();
    tracing::debug!(log = %log_path.display(), %now, "generating statistics");

    let summary = match generate_stats(log_path, now)
        .with_context(|| format!("failed to read session log {}", log_path.display()))
    {
        Ok(summary) => summary,
        Err(err) => {
            if json {
                let envelope = ErrorEnvelope {
                    status: "error",
                    error_code: "STATS_COMPUTE_FAILED",
                    message: format!("{err:#}"),
                };
                writeln!(writer, "{}", serde_json::to_string_pretty(&envelope)?)?;
            }
            return Err(err);
        }
    };

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(writer, "{}", format_report(&summary))?;
    }

    Ok(())
}

/// Formats the human-readable report output.
fn format_report(summary: &Summary) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "POMODORO STATS: {}",
        summary.date_scope.today.format("%A, %b %-d, %Y")
    )
    .unwrap();
    writeln!(
        output,
        "Week of {} ({} entries, {} malformed)",
        summary.date_scope.week_start.format("%b %-d, %Y"),
        summary.log_entries,
        summary.malformed_entries
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "SESSIONS").unwrap();
    writeln!(output, "────────").unwrap();
    for (name, totals) in [
        ("work", &summary.sessions.work),
        ("short_break", &summary.sessions.short_break),
        ("long_break", &summary.sessions.long_break),
    ] {
        writeln!(
            output,
            "{name:<12} {:>3} completed  {:>3} skipped  ({})",
            totals.completed,
            totals.skipped,
            format_duration(totals.total_duration_seconds)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "FOCUS").unwrap();
    writeln!(output, "─────").unwrap();
    writeln!(
        output,
        "Today:       {} work sessions ({})",
        summary.focus.today_work_sessions_completed,
        format_minutes(summary.focus.today_focus_minutes)
    )
    .unwrap();
    writeln!(
        output,
        "This week:   {}",
        format_minutes(summary.focus.week_focus_minutes)
    )
    .unwrap();
    writeln!(
        output,
        "Completion:  {:.0}%",
        summary.focus.completion_ratio * 100.0
    )
    .unwrap();
    writeln!(
        output,
        "Streak:      {} day(s)",
        summary.streaks.consecutive_focus_days
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Avg work session: {}",
        format_seconds(summary.averages.avg_work_session_duration_seconds)
    )
    .unwrap();
    writeln!(
        output,
        "Full cycles:      {}",
        summary.cycles.estimated_full_cycles_completed
    )
    .unwrap();

    output
}

/// Formats whole seconds as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats a fractional second count, flooring to whole seconds.
#[allow(clippy::cast_possible_truncation)]
fn format_seconds(seconds: f64) -> String {
    format_duration(seconds as i64)
}

/// Formats a fractional minute total as a duration string.
fn format_minutes(minutes: f64) -> String {
    format_seconds(minutes * 60.0)
}
