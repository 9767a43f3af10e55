//! Settings persistence.
//!
//! The document keeps the section and attribute names of the settings schema
//! (`statistics`, `big_pause`, `mini_pause`, ...). A missing section keeps its
//! defaults, a missing attribute in a present section reads as `false`/`0`, and
//! unknown keys are ignored so newer files still load.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::{ConfigSnapshot, Settings, ShutdownSnapshot, Statistics};
use crate::error::SettingsError;
use crate::units::Millis;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Load/save contract for the configuration and statistics snapshot.
pub trait SettingsStore: Send {
    /// `None` means "not loaded": the caller falls back to defaults.
    fn load(&self) -> Option<ConfigSnapshot>;

    fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), SettingsError>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/eyerest/settings.json`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(dir.join("eyerest").join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Option<ConfigSnapshot> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No settings loaded from {}: {}", self.path.display(), e);
                return None;
            }
        };

        match decode(&text) {
            Ok(Some(snapshot)) => {
                info!("Settings loaded from {}", self.path.display());
                Some(snapshot)
            }
            Ok(None) => {
                warn!("Settings file {} has no settings root", self.path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring malformed settings file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let text = encode(snapshot)?;
        fs::write(&self.path, text).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    settings: Option<SettingsNode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsNode {
    statistics: Option<StatisticsNode>,
    big_pause: Option<PauseNode>,
    mini_pause: Option<PauseNode>,
    warning: Option<WarningNode>,
    sounds: Option<FlagNode>,
    strict_mode: Option<FlagNode>,
    window_nearby: Option<FlagNode>,
    can_close_notifications: Option<FlagNode>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StatisticsNode {
    first_launch: bool,
    seen_settings: bool,
    long_break_count: u32,
    early_skip_count: u32,
    late_skip_count: u32,
    refuse_count: u32,
    postpone_count: u32,
    auto_break_count: u32,
    short_break_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_shutdown: Option<String>,
    last_big_pause_time_left: u32,
    last_mini_pause_time_left: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PauseNode {
    enabled: bool,
    interval: i64,
    duration: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct WarningNode {
    enabled: bool,
    interval: f32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct FlagNode {
    enabled: bool,
}

/// Decode a settings document; `Ok(None)` when the root is missing.
fn decode(text: &str) -> Result<Option<ConfigSnapshot>, SettingsError> {
    let document: Document = serde_json::from_str(text)?;
    let Some(node) = document.settings else {
        return Ok(None);
    };

    let mut snapshot = ConfigSnapshot::default();
    let settings = &mut snapshot.settings;

    if let Some(stats) = node.statistics {
        snapshot.statistics = Statistics {
            first_launch: stats.first_launch,
            seen_settings: stats.seen_settings,
            long_break_count: stats.long_break_count,
            early_skip_count: stats.early_skip_count,
            late_skip_count: stats.late_skip_count,
            refuse_count: stats.refuse_count,
            postpone_count: stats.postpone_count,
            auto_break_count: stats.auto_break_count,
            short_break_count: stats.short_break_count,
        };
        snapshot.shutdown = ShutdownSnapshot {
            last_shutdown: stats.last_shutdown.as_deref().and_then(parse_timestamp),
            last_big_pause_time_left: Millis::from(stats.last_big_pause_time_left),
            last_mini_pause_time_left: Millis::from(stats.last_mini_pause_time_left),
        };
    }

    if let Some(big) = node.big_pause {
        settings.big_pause_enabled = big.enabled;
        settings.big_pause_interval = big.interval;
        settings.big_pause_duration = big.duration;
    }

    if let Some(mini) = node.mini_pause {
        settings.mini_pause_enabled = mini.enabled;
        // files from old versions allowed shorter intervals
        settings.mini_pause_interval = mini.interval.max(5);
        settings.mini_pause_duration = if mini.duration == 0 { 8 } else { mini.duration };
    }

    if let Some(warning) = node.warning {
        settings.warning_enabled = warning.enabled;
        settings.warning_interval = warning.interval;
    }

    if let Some(flag) = node.sounds {
        settings.sounds_enabled = flag.enabled;
    }
    if let Some(flag) = node.strict_mode {
        settings.strict_mode_enabled = flag.enabled;
    }
    if let Some(flag) = node.window_nearby {
        settings.window_nearby = flag.enabled;
    }
    if let Some(flag) = node.can_close_notifications {
        settings.can_close_notifications = flag.enabled;
    }

    Ok(Some(snapshot))
}

fn encode(snapshot: &ConfigSnapshot) -> Result<String, SettingsError> {
    let Settings {
        big_pause_enabled,
        big_pause_interval,
        big_pause_duration,
        mini_pause_enabled,
        mini_pause_interval,
        mini_pause_duration,
        warning_enabled,
        warning_interval,
        sounds_enabled,
        strict_mode_enabled,
        window_nearby,
        can_close_notifications,
    } = snapshot.settings.clone();
    let stats = &snapshot.statistics;
    let (big_left, mini_left) = ShutdownSnapshot::capture(
        snapshot.shutdown.last_big_pause_time_left,
        snapshot.shutdown.last_mini_pause_time_left,
    );

    let document = Document {
        settings: Some(SettingsNode {
            statistics: Some(StatisticsNode {
                first_launch: stats.first_launch,
                seen_settings: stats.seen_settings,
                long_break_count: stats.long_break_count,
                early_skip_count: stats.early_skip_count,
                late_skip_count: stats.late_skip_count,
                refuse_count: stats.refuse_count,
                postpone_count: stats.postpone_count,
                auto_break_count: stats.auto_break_count,
                short_break_count: stats.short_break_count,
                last_shutdown: snapshot
                    .shutdown
                    .last_shutdown
                    .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, false)),
                last_big_pause_time_left: u32::try_from(big_left).unwrap_or(i32::MAX as u32),
                last_mini_pause_time_left: u32::try_from(mini_left).unwrap_or(i32::MAX as u32),
            }),
            big_pause: Some(PauseNode {
                enabled: big_pause_enabled,
                interval: big_pause_interval,
                duration: big_pause_duration,
            }),
            mini_pause: Some(PauseNode {
                enabled: mini_pause_enabled,
                interval: mini_pause_interval,
                duration: mini_pause_duration,
            }),
            warning: Some(WarningNode {
                enabled: warning_enabled,
                interval: warning_interval,
            }),
            sounds: Some(FlagNode { enabled: sounds_enabled }),
            strict_mode: Some(FlagNode { enabled: strict_mode_enabled }),
            window_nearby: Some(FlagNode { enabled: window_nearby }),
            can_close_notifications: Some(FlagNode {
                enabled: can_close_notifications,
            }),
        }),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// ISO-8601 with or without an offset; offset-less values are local time.
fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()?;
    Local.from_local_datetime(&naive).single()
}
