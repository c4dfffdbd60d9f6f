use chrono::{DateTime, Local, Utc};

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Wall-clock label used on chart axes, e.g. `14:03:27`.
pub fn time_label(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
