//! Persisted configuration module
//!
//! This module contains the user configuration model and its file store.

pub mod model;
pub mod store;

// Re-export main types
pub use model::{ConfigSnapshot, Correction, Settings, ShutdownSnapshot, Statistics};
pub use store::{JsonSettingsStore, SettingsStore};
