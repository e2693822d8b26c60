use chrono::{DateTime, Utc};

/// Formats a duration in seconds as `HH:MM:SS`.
///
/// Every component is zero-padded to two digits; hours are not wrapped at
/// 24, so a 30 hour episode renders as `30:00:00`.
pub fn duration_to_time_string(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Short publication date shown next to each episode, e.g. `8 Jan 21`.
pub fn published_date_string(date: &DateTime<Utc>) -> String {
    date.format("%-d %b %y").to_string()
}
