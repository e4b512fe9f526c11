use chrono::{DateTime, Utc};

fn to_utc(timestamp_ms: u64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(i64::try_from(timestamp_ms).ok()?)
}

/// `HH:MM:SS.mmm` in UTC, used by log lines.
pub fn format_clock_time(timestamp_ms: u64) -> String {
    to_utc(timestamp_ms)
        .map(|date| date.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// `HH:MM:SS UTC`, shown next to "Last updated".
pub fn format_last_updated(timestamp_ms: u64) -> String {
    to_utc(timestamp_ms)
        .map(|date| date.format("%H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// Coarse age label: `just now`, `42s ago`, `5m ago`, `2h ago`.
pub fn format_age(timestamp_ms: u64, now_ms: u64) -> String {
    let secs = now_ms.saturating_sub(timestamp_ms) / 1000;
    match secs {
        0..=4 => "just now".to_string(),
        5..=59 => format!("{secs}s ago"),
        60..=3_599 => format!("{}m ago", secs / 60),
        _ => format!("{}h ago", secs / 3_600),
    }
}
