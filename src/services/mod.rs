//! Collaborators of the break machine
//!
//! This module contains the seams to the desktop (activity, displays,
//! fullscreen detection, surfaces) and their headless implementations.

pub mod activity;
pub mod displays;
pub mod fullscreen;
pub mod headless;
pub mod windows;

// Re-export main types
pub use activity::{ActivityProbe, ActivitySignal, SignalActivityProbe};
#[cfg(feature = "input-hook")]
pub use activity::HookActivityProbe;
pub use displays::{DisplayEnumerator, FixedDisplays, Rect};
pub use fullscreen::{FullscreenBlock, FullscreenProbe, NoFullscreen, WindowHandle};
pub use headless::{HeadlessWindows, CONFIRMATION_TIMEOUT};
pub use windows::{
    Announcement, BreakDecision, SurfaceEvent, SurfaceHandle, SurfaceId, SurfaceKind, WindowFactory,
};
