//! Human-readable timestamps for room listings.

use chrono::{DateTime, Utc};

/// Format `at` relative to `now`: "Just now", "5h ago", "Yesterday",
/// or a `M/D/YYYY` date beyond two days.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - at).num_hours();

    if hours < 1 {
        "Just now".into()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if hours < 48 {
        "Yesterday".into()
    } else {
        at.format("%-m/%-d/%Y").to_string()
    }
}
