//! Error types for the scheduler and the settings store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the background task scheduler.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The scheduler loop needs a running tokio runtime to spawn on
    #[error("no tokio runtime available to run the timer loop")]
    NoRuntime,
}

/// Errors raised while reading or writing persisted settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed
    #[error("settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document could not be encoded or decoded
    #[error("settings encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// No per-user configuration directory exists on this platform
    #[error("no configuration directory available")]
    NoConfigDir,
}
