//! Time helpers
//!
//! All persisted timestamps in ClipFlow are epoch milliseconds (UTC).

use chrono::Utc;

/// Current time as epoch milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Minutes to milliseconds
pub fn minutes_to_ms(minutes: i64) -> i64 {
    minutes * 60_000
}
