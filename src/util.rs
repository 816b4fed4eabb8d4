use crate::error::{DashError, Result};
use crate::period::Timestamp;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use std::collections::BTreeMap;

/// `1234567` -> `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Entries by count, largest first; ties keep key order.
pub fn sorted_desc<K: Ord>(counts: &BTreeMap<K, u64>) -> Vec<(&K, u64)> {
    let mut entries: Vec<(&K, u64)> = counts.iter().map(|(k, v)| (k, *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

/// `count` as a percentage of `total`, rounded to one decimal.
pub fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    crate::aggregate::round1(count as f64 / total as f64 * 100.0)
}

/// A run of full blocks, one per `per_block` units of `value`.
pub fn bar(value: f64, per_block: f64) -> String {
    "█".repeat((value / per_block).max(0.0) as usize)
}

/// Parse a period bound: RFC3339, `YYYY-MM-DD` (midnight in `now`'s offset)
/// or a relative form such as `3 days ago`.
pub fn parse_date_bound(input: &str, now: Timestamp) -> Result<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return now
            .offset()
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .ok_or_else(|| DashError::InvalidDate(input.to_string()));
    }

    if let Some(ago) = parse_relative(input) {
        return now
            .checked_sub_signed(ago)
            .ok_or_else(|| DashError::InvalidDate(format!("Duration overflow for '{input}'")));
    }

    Err(DashError::InvalidDate(format!(
        "'{input}' (expected RFC3339, YYYY-MM-DD or 'N days|weeks|months ago')"
    )))
}

fn parse_relative(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let rest = input.strip_suffix(" ago")?;
    let (count, unit) = rest.split_once(' ')?;
    let n: i64 = count.trim().parse().ok()?;

    let days = match unit.trim() {
        "day" | "days" => n,
        "week" | "weeks" => n.checked_mul(7)?,
        "month" | "months" => n.checked_mul(30)?,
        _ => return None,
    };
    Duration::try_days(days)
}
