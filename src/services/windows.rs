//! Break, waiting and notification surfaces

use serde::{Deserialize, Serialize};

use crate::units::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    BigBreak,
    MiniBreak,
    Waiting,
    Confirmation,
    Notification,
}

/// Returned by the factory for every surface it opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    /// `None` for surfaces that are not tied to one display
    pub display: Option<usize>,
}

/// What the user chose on a confirmation or break surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakDecision {
    Accept,
    Postpone,
    Refuse,
    Skip,
}

/// Callbacks from surfaces into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Closed(SurfaceId),
    Decision(BreakDecision),
}

/// Balloon-style notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    FirstLaunch { big_pause_interval: Millis },
    ResumedAfterPause,
    AutoRelaxEnded { big_pause_left: Millis },
    Monitoring { big_pause_left: Millis },
}

pub trait WindowFactory: Send {
    fn open_break(&mut self, display: usize, duration_secs: i64) -> SurfaceHandle;

    fn open_mini_break(&mut self, display: usize, break_number: u32, duration_secs: i64) -> SurfaceHandle;

    fn open_waiting(&mut self, display: usize) -> SurfaceHandle;

    fn open_notification(&mut self, lead: Millis) -> SurfaceHandle;

    /// "Time for a break?" prompt shown before a big pause.
    fn open_confirmation(&mut self, display: usize, postpone_count: u32) -> SurfaceHandle;

    fn close(&mut self, surface: &SurfaceHandle);

    fn announce(&mut self, announcement: Announcement);

    /// End-of-break sound.
    fn chime(&mut self) {}
}
