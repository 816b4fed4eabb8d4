//! Calendar windows over commit activity.
//!
//! Every window is evaluated against an explicit `now` so results are
//! reproducible; [`crate::analyzer::Analyzer`] passes the local clock.
//! Midnights are resolved in `now`'s time zone, so buckets on the far side
//! of a daylight-saving change still start at local midnight.
//! Membership is inclusive on both ends.

use crate::model::{ActivitySummary, RepositoryStats};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use std::collections::BTreeSet;

pub type Timestamp = DateTime<FixedOffset>;

const LAST_SEVEN_DAYS_LABEL: &str = "Last 7 Days";

/// The local clock, with its current UTC offset.
pub fn local_now() -> Timestamp {
    Local::now().fixed_offset()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    /// Local midnight until now.
    Day,
    /// Monday midnight of the current week until now.
    Week,
    /// First of the month at midnight until now.
    Month,
    /// Caller-supplied bounds. Falls back to [`Period::LastSevenDays`] unless both are set.
    Custom {
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    },
    /// The seven days before now.
    LastSevenDays,
}

/// A labelled, inclusive time range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub label: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Window {
    pub fn contains(&self, ts: &Timestamp) -> bool {
        self.start <= *ts && *ts <= self.end
    }
}

impl Period {
    pub fn window_at<Tz: TimeZone>(&self, now: DateTime<Tz>) -> Window {
        let today = now.date_naive();
        let end = now.fixed_offset();
        let (label, start) = match self {
            Period::Day => ("Today".to_string(), midnight(&now, today)),
            Period::Week => ("This Week".to_string(), midnight(&now, monday_of(today))),
            Period::Month => ("This Month".to_string(), midnight(&now, month_start(today, 0))),
            Period::Custom {
                start: Some(start),
                end: Some(custom_end),
            } => {
                let label = format!("{} to {}", start.format("%Y-%m-%d"), custom_end.format("%Y-%m-%d"));
                return Window {
                    label,
                    start: *start,
                    end: *custom_end,
                };
            }
            Period::Custom { .. } | Period::LastSevenDays => {
                (LAST_SEVEN_DAYS_LABEL.to_string(), end - Duration::days(7))
            }
        };
        Window { label, start, end }
    }
}

/// Midnight of `date` in `now`'s time zone.
///
/// A midnight repeated by a clock change resolves to the earlier instant. A
/// midnight skipped by one falls back to `now`'s current offset.
fn midnight<Tz: TimeZone>(now: &DateTime<Tz>, date: NaiveDate) -> Timestamp {
    let local = date.and_time(NaiveTime::MIN);
    match now.timezone().from_local_datetime(&local).earliest() {
        Some(ts) => ts.fixed_offset(),
        None => {
            let fixed = now.fixed_offset();
            fixed
                .offset()
                .from_local_datetime(&local)
                .single()
                .unwrap_or(fixed)
        }
    }
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month `delta` months away from `date`'s month.
fn month_start(date: NaiveDate, delta: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(date)
}

/// `[start, next)` as an inclusive window ending one nanosecond before `next`.
fn bucket(label: String, start: Timestamp, next: Timestamp) -> Window {
    Window {
        label,
        start,
        end: next - Duration::nanoseconds(1),
    }
}

/// Aggregate every commit of `repos` falling inside `window`.
pub fn summarize_window(window: &Window, repos: &[RepositoryStats]) -> ActivitySummary {
    let mut summary = ActivitySummary::empty(window.label.clone(), window.start, window.end);
    let mut active: BTreeSet<&str> = BTreeSet::new();

    for repo in repos {
        for commit in repo.commits.iter().filter(|c| window.contains(&c.timestamp)) {
            active.insert(repo.path.as_str());
            summary.commits += 1;
            summary.lines_added += commit.lines_added;
            summary.lines_removed += commit.lines_removed;
            summary.files_changed += commit.files_changed;

            for fc in &commit.file_classifications {
                let changed = fc.lines_changed();
                *summary.contribution_breakdown.entry(fc.contribution_type).or_insert(0) += changed;
                if let Some(lang) = &fc.language {
                    *summary.language_breakdown.entry(lang.clone()).or_insert(0) += changed;
                }
            }
        }
    }

    summary.repos_active = active.len();
    summary
}

pub fn summarize_at<Tz: TimeZone>(
    now: DateTime<Tz>,
    period: &Period,
    repos: &[RepositoryStats],
) -> ActivitySummary {
    summarize_window(&period.window_at(now), repos)
}

/// The last `days` calendar days, today first.
pub fn daily_windows<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> Vec<Window> {
    let today = now.date_naive();
    (0..days as i64)
        .map(|back| {
            let day = today - Duration::days(back);
            let start = midnight(now, day);
            let next = midnight(now, day + Duration::days(1));
            bucket(start.format("%A, %b %d").to_string(), start, next)
        })
        .collect()
}

/// The last `weeks` Monday-based weeks, the current week first.
pub fn weekly_windows<Tz: TimeZone>(now: &DateTime<Tz>, weeks: u32) -> Vec<Window> {
    let monday = monday_of(now.date_naive());
    (0..weeks as i64)
        .map(|back| {
            let first = monday - Duration::weeks(back);
            let start = midnight(now, first);
            let next = midnight(now, first + Duration::weeks(1));
            bucket(start.format("Week of %b %d").to_string(), start, next)
        })
        .collect()
}

/// The last `months` calendar months, the current month first.
pub fn monthly_windows<Tz: TimeZone>(now: &DateTime<Tz>, months: u32) -> Vec<Window> {
    let today = now.date_naive();
    (0..months as i32)
        .map(|back| {
            let start = midnight(now, month_start(today, -back));
            let next = midnight(now, month_start(today, 1 - back));
            bucket(start.format("%B %Y").to_string(), start, next)
        })
        .collect()
}

/// The last `quarters` calendar quarters (Jan, Apr, Jul, Oct), the current quarter first.
pub fn quarterly_windows<Tz: TimeZone>(now: &DateTime<Tz>, quarters: u32) -> Vec<Window> {
    let today = now.date_naive();
    let current = month_start(today, -((today.month0() % 3) as i32));
    (0..quarters as i32)
        .map(|back| {
            let first = month_start(current, -3 * back);
            let start = midnight(now, first);
            let next = midnight(now, month_start(first, 3));
            let label = format!("Q{} {}", first.month0() / 3 + 1, first.year());
            bucket(label, start, next)
        })
        .collect()
}

pub fn daily_at<Tz: TimeZone>(now: DateTime<Tz>, days: u32, repos: &[RepositoryStats]) -> Vec<ActivitySummary> {
    daily_windows(&now, days).iter().map(|w| summarize_window(w, repos)).collect()
}

pub fn weekly_at<Tz: TimeZone>(now: DateTime<Tz>, weeks: u32, repos: &[RepositoryStats]) -> Vec<ActivitySummary> {
    weekly_windows(&now, weeks).iter().map(|w| summarize_window(w, repos)).collect()
}

pub fn monthly_at<Tz: TimeZone>(now: DateTime<Tz>, months: u32, repos: &[RepositoryStats]) -> Vec<ActivitySummary> {
    monthly_windows(&now, months).iter().map(|w| summarize_window(w, repos)).collect()
}

pub fn quarterly_at<Tz: TimeZone>(
    now: DateTime<Tz>,
    quarters: u32,
    repos: &[RepositoryStats],
) -> Vec<ActivitySummary> {
    quarterly_windows(&now, quarters).iter().map(|w| summarize_window(w, repos)).collect()
}
