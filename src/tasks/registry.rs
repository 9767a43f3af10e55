//! Registry of task completion targets

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::debug;

use crate::units::Millis;

/// Anything that can be woken by a task completion.
pub trait TaskTarget: Send {
    /// `progress` is elapsed / requested; `elapsed` is the actual wall time.
    fn on_task_complete(&mut self, progress: f32, elapsed: Millis);
}

pub type SharedTarget = Arc<Mutex<dyn TaskTarget>>;

/// Maps a stable target name to its handle.
#[derive(Default)]
pub struct TargetRegistry {
    targets: Mutex<HashMap<String, SharedTarget>>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, target: SharedTarget) {
        let name = name.into();
        debug!("Registering task target {}", name);
        self.targets().insert(name, target);
    }

    pub fn unregister(&self, name: &str) -> bool {
        let removed = self.targets().remove(name).is_some();
        if removed {
            debug!("Unregistered task target {}", name);
        }
        removed
    }

    /// Clone of the handle; the registry lock is released on return.
    pub fn get(&self, name: &str) -> Option<SharedTarget> {
        self.targets().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.targets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn targets(&self) -> MutexGuard<'_, HashMap<String, SharedTarget>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
