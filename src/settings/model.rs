//! User configuration, usage statistics and the shutdown snapshot.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::units::{minutes, minutes_f, Millis};

pub const MAX_BIG_PAUSE_INTERVAL: i64 = 120;
pub const MAX_BIG_PAUSE_DURATION: i64 = 30;
pub const MAX_MINI_PAUSE_INTERVAL: i64 = 30;
pub const MAX_MINI_PAUSE_DURATION: i64 = 20;
pub const MAX_WARNING_INTERVAL: f32 = 3.0;

/// User-editable break configuration. Intervals and durations are minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub big_pause_enabled: bool,
    pub big_pause_interval: i64,
    pub big_pause_duration: i64,
    pub mini_pause_enabled: bool,
    pub mini_pause_interval: i64,
    pub mini_pause_duration: i64,
    pub warning_enabled: bool,
    /// Lead time of the countdown notification, fractional minutes
    pub warning_interval: f32,
    pub sounds_enabled: bool,
    pub strict_mode_enabled: bool,
    pub window_nearby: bool,
    pub can_close_notifications: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            big_pause_enabled: true,
            big_pause_interval: 50,
            big_pause_duration: 5,
            mini_pause_enabled: true,
            mini_pause_interval: 10,
            mini_pause_duration: 8,
            warning_enabled: true,
            warning_interval: 0.5,
            sounds_enabled: true,
            strict_mode_enabled: false,
            window_nearby: true,
            can_close_notifications: false,
        }
    }
}

impl Settings {
    pub fn big_pause_interval_ms(&self) -> Millis {
        minutes(self.big_pause_interval)
    }

    pub fn big_pause_duration_ms(&self) -> Millis {
        minutes(self.big_pause_duration)
    }

    pub fn mini_pause_interval_ms(&self) -> Millis {
        minutes(self.mini_pause_interval)
    }

    pub fn warning_lead_ms(&self) -> Millis {
        minutes_f(self.warning_interval)
    }

    /// Clamp every value into `[0, documented maximum]`.
    ///
    /// Returns one record per corrected field; an empty vector means the
    /// configuration was already in range.
    pub fn clamp(&mut self) -> Vec<Correction> {
        let mut corrections = Vec::new();

        clamp_int(&mut self.big_pause_interval, MAX_BIG_PAUSE_INTERVAL, "big_pause_interval", &mut corrections);
        clamp_int(&mut self.big_pause_duration, MAX_BIG_PAUSE_DURATION, "big_pause_duration", &mut corrections);
        let warning = if self.warning_interval.is_nan() {
            0.0
        } else {
            self.warning_interval.clamp(0.0, MAX_WARNING_INTERVAL)
        };
        if warning != self.warning_interval {
            corrections.push(Correction::new("warning_interval", self.warning_interval, warning));
            self.warning_interval = warning;
        }
        clamp_int(&mut self.mini_pause_interval, MAX_MINI_PAUSE_INTERVAL, "mini_pause_interval", &mut corrections);
        clamp_int(&mut self.mini_pause_duration, MAX_MINI_PAUSE_DURATION, "mini_pause_duration", &mut corrections);

        corrections
    }
}

fn clamp_int(value: &mut i64, max: i64, field: &'static str, corrections: &mut Vec<Correction>) {
    let clamped = (*value).clamp(0, max);
    if clamped != *value {
        corrections.push(Correction::new(field, *value as f64, clamped as f64));
        *value = clamped;
    }
}

/// Diagnostic record for a value that was pulled back into range.
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub field: &'static str,
    pub from: f64,
    pub to: f64,
}

impl Correction {
    pub fn new(field: &'static str, from: impl Into<f64>, to: impl Into<f64>) -> Self {
        Self {
            field,
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} corrected from {} to {}", self.field, self.from, self.to)
    }
}

/// Usage counters. They only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub first_launch: bool,
    pub seen_settings: bool,
    pub long_break_count: u32,
    pub early_skip_count: u32,
    pub late_skip_count: u32,
    pub refuse_count: u32,
    pub postpone_count: u32,
    pub auto_break_count: u32,
    pub short_break_count: u32,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            first_launch: true,
            seen_settings: false,
            long_break_count: 0,
            early_skip_count: 0,
            late_skip_count: 0,
            refuse_count: 0,
            postpone_count: 0,
            auto_break_count: 0,
            short_break_count: 0,
        }
    }
}

/// Countdown values captured at the last save, plus the moment of the last
/// orderly shutdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShutdownSnapshot {
    pub last_shutdown: Option<DateTime<Local>>,
    pub last_big_pause_time_left: Millis,
    pub last_mini_pause_time_left: Millis,
}

impl ShutdownSnapshot {
    /// Persisted countdowns are unsigned 32-bit-signed-max values.
    pub fn capture(big_left: Millis, mini_left: Millis) -> (Millis, Millis) {
        let cap = |ms: Millis| ms.clamp(0, i64::from(i32::MAX));
        (cap(big_left), cap(mini_left))
    }
}

/// Everything the settings store loads and saves in one piece.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSnapshot {
    pub settings: Settings,
    pub statistics: Statistics,
    pub shutdown: ShutdownSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reset_settings() {
        let settings = Settings::default();
        assert_eq!(settings.big_pause_interval_ms(), 50 * 60_000);
        assert_eq!(settings.mini_pause_interval_ms(), 10 * 60_000);
        assert_eq!(settings.warning_lead_ms(), 30_000);
        assert!(Statistics::default().first_launch);
    }

    #[test]
    fn clamp_reports_every_out_of_range_field() {
        let mut settings = Settings {
            big_pause_interval: 500,
            big_pause_duration: 31,
            mini_pause_interval: 45,
            mini_pause_duration: 21,
            warning_interval: 3.5,
            ..Settings::default()
        };

        let corrections = settings.clamp();

        assert_eq!(corrections.len(), 5);
        assert_eq!(settings.big_pause_interval, 120);
        assert_eq!(settings.big_pause_duration, 30);
        assert_eq!(settings.mini_pause_interval, 30);
        assert_eq!(settings.mini_pause_duration, 20);
        assert_eq!(settings.warning_interval, 3.0);
        assert_eq!(corrections[0].to_string(), "big_pause_interval corrected from 500 to 120");
    }

    #[test]
    fn clamp_raises_negative_values_to_zero() {
        let mut settings = Settings {
            big_pause_interval: i64::MIN,
            mini_pause_duration: -3,
            warning_interval: -1.0,
            ..Settings::default()
        };

        let corrections = settings.clamp();

        assert_eq!(corrections.len(), 3);
        assert_eq!(settings.big_pause_interval, 0);
        assert_eq!(settings.mini_pause_duration, 0);
        assert_eq!(settings.warning_interval, 0.0);
        assert_eq!(settings.big_pause_interval_ms(), 0);
    }

    #[test]
    fn clamp_leaves_valid_settings_alone() {
        let mut settings = Settings::default();
        assert!(settings.clamp().is_empty());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn capture_caps_to_signed_32_bit_range() {
        assert_eq!(ShutdownSnapshot::capture(i64::MAX, -20), (i64::from(i32::MAX), 0));
    }
}
