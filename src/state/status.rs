//! Status snapshot published after every machine step

use serde::{Deserialize, Serialize};

use super::break_machine::BreakState;
use crate::units::{as_seconds, format_countdown, Millis};

/// Derived display data for the tray tooltip and the control API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub state: BreakState,
    pub next: Option<BreakState>,
    pub paused: bool,
    pub big_pause_left_secs: i64,
    pub mini_pause_left_secs: i64,
    pub inactivity_secs: i64,
    pub relaxing_left_secs: i64,
    pub tooltip: String,
}

impl StatusSnapshot {
    /// Snapshot of a machine that has not started yet.
    pub fn new() -> Self {
        Self {
            state: BreakState::Idle,
            next: None,
            paused: false,
            big_pause_left_secs: 0,
            mini_pause_left_secs: 0,
            inactivity_secs: 0,
            relaxing_left_secs: 0,
            tooltip: tooltip(None, false, 0, 0),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Tooltip text, chosen by the pending state.
pub fn tooltip(next: Option<BreakState>, big_pause_enabled: bool, big_pause_left: Millis, inactivity: Millis) -> String {
    match next {
        Some(BreakState::AutoRelax) => "Away from the screen, relaxing".to_string(),
        Some(BreakState::Suspended) => format!("Paused, resumes in {}", format_countdown(inactivity)),
        _ if big_pause_enabled => format!("Next long break in {}", format_countdown(big_pause_left)),
        _ => "eyerest".to_string(),
    }
}

pub(crate) fn secs(ms: Millis) -> i64 {
    as_seconds(ms.max(0))
}
