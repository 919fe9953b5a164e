//! Timestamps as RFC 3339 strings, millisecond precision.
//!
//! Stored documents keep their timestamps as strings so lexicographic
//! ordering matches chronological ordering and round-trips are exact.

use chrono::{Duration, SecondsFormat, Utc};

/// Current instant, e.g. `2024-06-01T12:30:45.123Z`.
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Date-only string `days` from now, e.g. `2024-06-08`.
pub(crate) fn date_after_days(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}
