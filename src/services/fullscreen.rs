//! Fullscreen application detection

use serde::{Deserialize, Serialize};

/// Opaque native window handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowHandle(pub u64);

/// A foreground window that exactly covers one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenBlock {
    pub display: usize,
    pub window: WindowHandle,
}

pub trait FullscreenProbe: Send {
    fn query(&self) -> Option<FullscreenBlock>;

    /// Strict mode: push the blocking window out of the way.
    fn force_minimize(&mut self, window: WindowHandle) -> bool;
}

/// Probe for platforms without foreground-window inspection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFullscreen;

impl FullscreenProbe for NoFullscreen {
    fn query(&self) -> Option<FullscreenBlock> {
        None
    }

    fn force_minimize(&mut self, _window: WindowHandle) -> bool {
        false
    }
}
