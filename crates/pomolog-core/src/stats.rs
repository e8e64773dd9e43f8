//! Statistics aggregation over parsed session entries.
//!
//! [`compute_stats`] reduces a slice of entries to a [`Summary`] in a
//! single pass plus a streak walk. The reference instant is an explicit
//! parameter: every date comparison in one invocation (today, the Monday
//! week window, the streak) derives from the same `now`, so an entry can
//! never land on different sides of a midnight boundary mid-computation.

use std::collections::HashSet;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::parser::{LogError, parse_log_file};
use crate::session::{SessionEntry, SessionKind, SessionStatus};

/// Completed work sessions per full pomodoro cycle.
const SESSIONS_PER_CYCLE: usize = 4;

/// Aggregated statistics for one session log, as of a reference instant.
///
/// Field names are a stable external contract; the JSON rendering of this
/// struct is what downstream consumers parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The reference instant the statistics were computed against.
    pub generated_at: NaiveDateTime,
    /// Count of well-formed entries.
    pub log_entries: usize,
    /// Count of lines that failed the grammar or timestamp parse.
    pub malformed_entries: usize,
    pub date_scope: DateScope,
    pub sessions: SessionTotals,
    pub focus: FocusMetrics,
    pub streaks: Streaks,
    pub averages: Averages,
    pub cycles: Cycles,
}

/// The calendar window the summary was computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateScope {
    pub today: NaiveDate,
    /// Monday of the week containing `today`.
    pub week_start: NaiveDate,
    /// Sunday of the same week, inclusive.
    pub week_end: NaiveDate,
}

/// Per-kind counters for the three recognized session kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTotals {
    pub work: KindTotals,
    pub short_break: KindTotals,
    pub long_break: KindTotals,
}

impl SessionTotals {
    fn bucket_mut(&mut self, kind: SessionKind) -> &mut KindTotals {
        match kind {
            SessionKind::Work => &mut self.work,
            SessionKind::ShortBreak => &mut self.short_break,
            SessionKind::LongBreak => &mut self.long_break,
        }
    }

    /// Completed and completed-plus-skipped counts across all three kinds.
    fn completion_counts(&self) -> (usize, usize) {
        let kinds = [&self.work, &self.short_break, &self.long_break];
        let completed: usize = kinds.iter().map(|k| k.completed).sum();
        let skipped: usize = kinds.iter().map(|k| k.skipped).sum();
        (completed, completed + skipped)
    }
}

/// Counters for a single session kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTotals {
    pub completed: usize,
    pub skipped: usize,
    /// Summed `duration_seconds` of completed sessions only.
    pub total_duration_seconds: i64,
}

/// Work-focused metrics for today and the current week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusMetrics {
    pub today_work_sessions_completed: usize,
    pub today_focus_minutes: f64,
    pub week_focus_minutes: f64,
    /// Completed over completed-plus-skipped across the recognized kinds;
    /// 0.0 when nothing was attempted.
    pub completion_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    /// Consecutive days ending today with at least one completed work
    /// session. 0 whenever today itself has none.
    pub consecutive_focus_days: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    /// Mean duration of completed work sessions; 0.0 when there are none.
    pub avg_work_session_duration_seconds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycles {
    /// Full 4-session cycles implied by the completed work count.
    pub estimated_full_cycles_completed: usize,
}

/// Monday and Sunday (inclusive) of the week containing `today`.
fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since_monday = today.weekday().num_days_from_monday();
    let week_start = today - Duration::days(i64::from(days_since_monday));
    let week_end = week_start + Duration::days(6);
    (week_start, week_end)
}

/// Counts consecutive days, ending at `today` inclusive, with at least one
/// completed work session.
fn consecutive_focus_days(entries: &[SessionEntry], today: NaiveDate) -> usize {
    let focus_dates: HashSet<NaiveDate> = entries
        .iter()
        .filter(|entry| entry.is_completed_work())
        .map(|entry| entry.timestamp.date())
        .collect();

    let mut streak = 0;
    let mut day = today;
    while focus_dates.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Computes the summary for `entries` against the reference instant `now`.
///
/// Pure: the clock is never read here. The caller captures `now` once per
/// invocation and passes it down, which also pins every date window in
/// tests.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_stats(
    entries: &[SessionEntry],
    malformed_entries: usize,
    now: NaiveDateTime,
) -> Summary {
    let today = now.date();
    let (week_start, week_end) = week_bounds(today);

    let mut sessions = SessionTotals::default();
    let mut today_work_sessions = 0usize;
    let mut today_focus_seconds = 0i64;
    let mut week_focus_seconds = 0i64;

    for entry in entries {
        let kind = entry.session_type.parse::<SessionKind>().ok();
        let status = entry.status.parse::<SessionStatus>().ok();

        if let (Some(kind), Some(status)) = (kind, status) {
            let bucket = sessions.bucket_mut(kind);
            match status {
                SessionStatus::Completed => {
                    bucket.completed += 1;
                    bucket.total_duration_seconds += entry.duration_seconds;
                }
                SessionStatus::Skipped => bucket.skipped += 1,
            }
        }

        if kind == Some(SessionKind::Work) && status == Some(SessionStatus::Completed) {
            let entry_date = entry.timestamp.date();
            if entry_date == today {
                today_work_sessions += 1;
                today_focus_seconds += entry.duration_seconds;
            }
            if (week_start..=week_end).contains(&entry_date) {
                week_focus_seconds += entry.duration_seconds;
            }
        }
    }

    let (completed, attempted) = sessions.completion_counts();
    let completion_ratio = if attempted > 0 {
        completed as f64 / attempted as f64
    } else {
        0.0
    };

    let avg_work_session_duration_seconds = if sessions.work.completed > 0 {
        sessions.work.total_duration_seconds as f64 / sessions.work.completed as f64
    } else {
        0.0
    };

    Summary {
        generated_at: now,
        log_entries: entries.len(),
        malformed_entries,
        date_scope: DateScope {
            today,
            week_start,
            week_end,
        },
        focus: FocusMetrics {
            today_work_sessions_completed: today_work_sessions,
            today_focus_minutes: today_focus_seconds as f64 / 60.0,
            week_focus_minutes: week_focus_seconds as f64 / 60.0,
            completion_ratio,
        },
        streaks: Streaks {
            consecutive_focus_days: consecutive_focus_days(entries, today),
        },
        averages: Averages {
            avg_work_session_duration_seconds,
        },
        cycles: Cycles {
            estimated_full_cycles_completed: sessions.work.completed / SESSIONS_PER_CYCLE,
        },
        sessions,
    }
}

/// Parses the log at `log_path` and computes its summary in one call.
pub fn generate_stats(log_path: &Path, now: NaiveDateTime) -> Result<Summary, LogError> {
    let (entries, malformed) = parse_log_file(log_path)?;
    Ok(compute_stats(&entries, malformed, now))
}
