//! Interchange rendering for timestamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 in UTC with a `Z` suffix. Sub-second digits appear only when
/// non-zero, so `2024-03-05T14:30:00Z` renders unchanged.
pub fn render(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
