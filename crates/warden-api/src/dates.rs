//! Date query-parameter parsing.

use chrono::{DateTime, NaiveDate};

/// Parse a date query parameter into epoch milliseconds. Accepts an
/// RFC 3339 timestamp, a bare `YYYY-MM-DD` date (midnight UTC), or a
/// plain epoch-milliseconds integer.
pub fn parse_date(raw: &str) -> Option<u64> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return u64::try_from(ts.timestamp_millis()).ok();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
        return u64::try_from(midnight.timestamp_millis()).ok();
    }
    raw.parse::<u64>().ok()
}
