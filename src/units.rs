//! Duration representation shared by every countdown.
//!
//! Countdowns are signed milliseconds so that a value can dip below zero for the
//! single step in which it becomes due. Minutes and seconds only exist in the user
//! configuration and are converted here.

/// Signed milliseconds.
pub type Millis = i64;

pub const fn seconds(secs: i64) -> Millis {
    secs.saturating_mul(1000)
}

pub const fn minutes(mins: i64) -> Millis {
    mins.saturating_mul(60_000)
}

/// Fractional minutes, used by the warning lead time.
pub fn minutes_f(mins: f32) -> Millis {
    (f64::from(mins) * 60_000.0) as Millis
}

/// Whole seconds, truncating, for display text.
pub fn as_seconds(ms: Millis) -> i64 {
    ms / 1000
}

/// Human readable "1h 5m" / "4m 10s" / "12s" rendering of a countdown.
pub fn format_countdown(ms: Millis) -> String {
    let total = as_seconds(ms.max(0));
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
