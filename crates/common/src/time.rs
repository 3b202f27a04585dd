use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds. Clamps to 0 for a pre-epoch clock.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
