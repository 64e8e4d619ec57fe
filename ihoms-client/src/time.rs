//! Relative timestamps for ticket lists and comment threads

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

/// Parse a backend timestamp. Offset-less values are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Human-readable age of `value` as seen at `now`:
/// "Just now", "5 minutes ago", "2 hours ago", "Yesterday at 2:30 PM",
/// "Oct 25 at 2:17 PM" within the same year, "Oct 25, 2024 at 2:17 PM"
/// otherwise. Unparsable input yields `""`.
pub fn format_relative(value: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(value) else {
        return String::new();
    };

    let elapsed = now.signed_duration_since(then);
    if elapsed < Duration::minutes(1) {
        return "Just now".to_string();
    }
    if elapsed < Duration::hours(1) {
        return plural(elapsed.num_minutes(), "minute");
    }
    if elapsed < Duration::days(1) {
        return plural(elapsed.num_hours(), "hour");
    }

    let time = then.format("%-I:%M %p");
    if Some(then.date_naive()) == now.date_naive().pred_opt() {
        return format!("Yesterday at {}", time);
    }
    if then.year() == now.year() {
        format!("{} at {}", then.format("%b %-d"), time)
    } else {
        format!("{} at {}", then.format("%b %-d, %Y"), time)
    }
}

/// [`format_relative`] against the current time
pub fn format_relative_now(value: &str) -> String {
    format_relative(value, Utc::now())
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{} ago", n, unit, if n == 1 { "" } else { "s" })
}
