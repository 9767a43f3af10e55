//! eyerest - a break reminder daemon
//!
//! This library provides the break state machine that schedules long and short
//! breaks, the task scheduler that clocks it, persisted settings, and the HTTP
//! control API that stands in for a tray menu.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod units;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, BreakStateMachine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
