//! Timestamp helpers shared by the item and staff views

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display format used for claim timestamps and formatted dates
pub const DISPLAY_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Format used in upload filenames
pub const FILENAME_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Human readable age of a found item, e.g. "2 days ago" or "Just now".
///
/// Only the largest whole unit is reported. Dates in the future read as "Just now".
pub fn time_stored(date_found: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = now - date_found;

    let days = delta.num_days();
    let hours = delta.num_hours();
    let minutes = delta.num_minutes();

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "Just now".to_string()
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{} {}s ago", n, unit)
    } else {
        format!("{} {} ago", n, unit)
    }
}

/// Parse the ISO-8601 variants found in the JSON documents
pub fn parse_iso(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Render an ISO-8601 timestamp for display.
///
/// Values that do not parse are returned unchanged.
pub fn format_datetime(raw: &str) -> String {
    match parse_iso(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
