//! Display enumeration

use serde::{Deserialize, Serialize};

/// Display geometry in virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

pub trait DisplayEnumerator: Send {
    fn count(&self) -> usize;

    fn geometry(&self, index: usize) -> Option<Rect>;
}

/// A fixed list of displays.
#[derive(Debug, Clone)]
pub struct FixedDisplays {
    displays: Vec<Rect>,
}

impl FixedDisplays {
    /// `count` 1920x1080 displays side by side.
    pub fn new(count: usize) -> Self {
        let displays = (0..count.max(1))
            .map(|i| Rect::new(i as i32 * 1920, 0, 1920, 1080))
            .collect();
        Self { displays }
    }
}

impl DisplayEnumerator for FixedDisplays {
    fn count(&self) -> usize {
        self.displays.len()
    }

    fn geometry(&self, index: usize) -> Option<Rect> {
        self.displays.get(index).copied()
    }
}
