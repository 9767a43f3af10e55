//! Countdowns and open surfaces owned by the break machine

use serde::Serialize;

use crate::services::{SurfaceHandle, SurfaceId, SurfaceKind};
use crate::units::Millis;

/// Every timer the break machine keeps. Zero means inactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdowns {
    pub time_to_big_pause: Millis,
    pub time_to_mini_pause: Millis,
    /// Counts up while the user is idle, down while paused
    pub inactivity: Millis,
    pub relaxing_time_left: Millis,
    pub fullscreen_block_duration: Millis,
}

/// Surfaces currently on screen, by kind.
#[derive(Debug, Clone, Default)]
pub struct ActiveSurfaces {
    open: Vec<SurfaceHandle>,
}

impl ActiveSurfaces {
    pub fn insert(&mut self, surface: SurfaceHandle) {
        self.open.push(surface);
    }

    /// Forget a surface that closed on its own. Unknown ids are ignored.
    pub fn remove(&mut self, id: SurfaceId) -> Option<SurfaceHandle> {
        let index = self.open.iter().position(|s| s.id == id)?;
        Some(self.open.remove(index))
    }

    /// Remove and return every surface of `kind`.
    pub fn take(&mut self, kind: SurfaceKind) -> Vec<SurfaceHandle> {
        let (taken, kept) = std::mem::take(&mut self.open)
            .into_iter()
            .partition(|s| s.kind == kind);
        self.open = kept;
        taken
    }

    pub fn count(&self, kind: SurfaceKind) -> usize {
        self.open.iter().filter(|s| s.kind == kind).count()
    }

    pub fn any(&self, kind: SurfaceKind) -> bool {
        self.open.iter().any(|s| s.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}
