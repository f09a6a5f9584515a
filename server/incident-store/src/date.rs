//! Timestamp formatting and lenient parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format as ISO-8601 UTC with microseconds and a literal `Z`,
/// e.g. `2025-01-15T10:30:00.123456Z`. Fixed width, so string order is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
  ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

pub fn now_timestamp() -> String {
  format_timestamp(&Utc::now())
}

/// Parse a stored timestamp. Accepts RFC 3339 (any offset) as well as naive
/// ISO-8601 with or without a trailing `Z` and fractional seconds.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc).naive_utc());
  }
  let naive = s.strip_suffix('Z').unwrap_or(s);
  NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
