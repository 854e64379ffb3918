//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Display format used for the `time` field of chat payloads.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock for tests: returns a fixed time until moved with [`FixedClock::set`].
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(fixed_time_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Format a Unix timestamp (milliseconds) as `YYYY-MM-DD HH:MM:SS` in JST.
///
/// Out-of-range timestamps format as an empty string.
pub fn format_display_time(timestamp_millis: i64) -> String {
    to_jst(timestamp_millis)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

fn to_jst(timestamp_millis: i64) -> Option<DateTime<FixedOffset>> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS)?;
    jst.timestamp_millis_opt(timestamp_millis).single()
}
