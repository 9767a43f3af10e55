//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::{error::SettingsError, settings::JsonSettingsStore};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "eyerest")]
#[command(about = "Break reminder daemon with an HTTP control API")]
#[command(version)]
pub struct Config {
    /// Port to bind the control API to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Settings file, defaults to the per-user configuration directory
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Number of displays to open break surfaces on
    #[arg(short, long, default_value = "1")]
    pub displays: usize,

    /// Resolution of the task scheduler in milliseconds
    #[arg(long, default_value = "50")]
    pub tick_ms: u64,

    /// Run every countdown this many times faster (diagnostics)
    #[arg(short, long, default_value = "1")]
    pub multiplier: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_resolution(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Explicit settings path or the default location
    pub fn settings_path(&self) -> Result<PathBuf, SettingsError> {
        match &self.settings {
            Some(path) => Ok(path.clone()),
            None => JsonSettingsStore::default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_locally() {
        let config = Config::try_parse_from(["eyerest"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.tick_resolution(), Duration::from_millis(50));
        assert_eq!(config.multiplier, 1);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn explicit_settings_path_wins() {
        let config = Config::try_parse_from(["eyerest", "--settings", "/tmp/eyerest.json", "-v"]).unwrap();
        assert_eq!(config.settings_path().unwrap(), PathBuf::from("/tmp/eyerest.json"));
        assert_eq!(config.log_level(), "debug");
    }
}
