//! Named single-shot task scheduler
//!
//! Every target (the break machine, a countdown surface) asks for "call me back
//! in N ms" under its own name. Only the most recent request per name is kept.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info};

use super::tick_source::TickSource;
use crate::{error::SchedulerError, units::Millis};

/// Default timer resolution of the scheduler loop.
pub const DEFAULT_RESOLUTION: Duration = Duration::from_millis(50);

/// Posted once when a task expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEvent {
    pub target: String,
    pub requested: Duration,
    /// Actual wall time since the task was armed, drift included
    pub elapsed: Duration,
    /// Recognition token of the request that produced this event
    pub token: u64,
}

impl CompletionEvent {
    /// Fraction of the requested duration that actually went by.
    pub fn progress(&self) -> f32 {
        if self.requested.is_zero() {
            return 1.0;
        }
        self.elapsed.as_secs_f32() / self.requested.as_secs_f32()
    }

    pub fn elapsed_ms(&self) -> Millis {
        Millis::try_from(self.elapsed.as_millis()).unwrap_or(Millis::MAX)
    }
}

/// Seam between task targets and the scheduler.
pub trait TaskScheduler: Send + Sync {
    /// Request a completion for `target` after `delay`, replacing any pending one.
    fn schedule(&self, target: &str, delay: Millis);

    /// Forget `target`: drop its pending request and its latest token.
    fn cancel(&self, _target: &str) {}
}

#[derive(Debug)]
struct PendingTask {
    requested: Duration,
    armed_at: Instant,
    token: u64,
}

#[derive(Debug, Default)]
struct Shared {
    pending: Mutex<HashMap<String, PendingTask>>,
    latest: Mutex<HashMap<String, u64>>,
    next_token: AtomicU64,
    stopped: AtomicBool,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the scheduler loop. Cheap to clone.
#[derive(Debug, Clone)]
pub struct TaskManager {
    shared: Arc<Shared>,
}

impl TaskManager {
    /// Spawn the scheduler loop on the current tokio runtime.
    ///
    /// Returns the handle and the single queue all completion events go to.
    pub fn start(resolution: Duration) -> Result<(Self, UnboundedReceiver<CompletionEvent>), SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let shared = Arc::new(Shared::default());
        let handle = runtime.spawn(scheduler_loop(Arc::clone(&shared), events_tx, resolution));
        *lock(&shared.loop_handle) = Some(handle);

        info!("Task manager started with {}ms resolution", resolution.as_millis());
        Ok((Self { shared }, events_rx))
    }

    /// Arm a single-shot timer for `target`. A pending timer with the same name
    /// is discarded. Does nothing once the manager is stopped.
    pub fn add_task(&self, target: &str, delay: Millis) {
        if self.is_stopped() {
            debug!("Task manager stopped, ignoring task for {}", target);
            return;
        }

        let token = self.shared.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let requested = Duration::from_millis(u64::try_from(delay).unwrap_or(0));

        lock(&self.shared.latest).insert(target.to_string(), token);
        let replaced = lock(&self.shared.pending).insert(
            target.to_string(),
            PendingTask {
                requested,
                armed_at: Instant::now(),
                token,
            },
        );

        if let Some(old) = replaced {
            debug!("Task {} (token {}) superseded by token {}", target, old.token, token);
        }
    }

    /// Drop the pending timer and the token bookkeeping of `target`.
    pub fn remove_task(&self, target: &str) {
        let armed = lock(&self.shared.pending).remove(target).is_some();
        if lock(&self.shared.latest).remove(target).is_some() {
            debug!("Task {} removed (armed: {})", target, armed);
        }
    }

    /// True while `event` answers the latest request made for its target.
    pub fn is_current(&self, event: &CompletionEvent) -> bool {
        !self.is_stopped() && lock(&self.shared.latest).get(&event.target) == Some(&event.token)
    }

    /// Number of armed timers.
    pub fn pending_count(&self) -> usize {
        lock(&self.shared.pending).len()
    }

    /// Number of targets with a recognition token on record.
    pub fn tracked_count(&self) -> usize {
        lock(&self.shared.latest).len()
    }

    /// Stop the loop. Armed timers are dropped without firing.
    pub fn stop(&self) {
        if self.shared.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        lock(&self.shared.pending).clear();
        if let Some(handle) = lock(&self.shared.loop_handle).take() {
            handle.abort();
        }
        info!("Task manager stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }
}

impl TaskScheduler for TaskManager {
    fn schedule(&self, target: &str, delay: Millis) {
        self.add_task(target, delay);
    }

    fn cancel(&self, target: &str) {
        self.remove_task(target);
    }
}

async fn scheduler_loop(shared: Arc<Shared>, events: UnboundedSender<CompletionEvent>, resolution: Duration) {
    let mut ticks = TickSource::new(resolution);

    loop {
        ticks.tick().await;
        if shared.stopped.load(Ordering::SeqCst) {
            break;
        }

        let now = Instant::now();
        let due: Vec<CompletionEvent> = {
            let mut pending = lock(&shared.pending);
            let expired: Vec<String> = pending
                .iter()
                .filter(|(_, task)| now >= task.armed_at + task.requested)
                .map(|(name, _)| name.clone())
                .collect();

            expired
                .into_iter()
                .filter_map(|name| {
                    pending.remove(&name).map(|task| CompletionEvent {
                        target: name,
                        requested: task.requested,
                        elapsed: now.saturating_duration_since(task.armed_at),
                        token: task.token,
                    })
                })
                .collect()
        };

        for event in due {
            if events.send(event).is_err() {
                debug!("Completion queue closed, scheduler loop exiting");
                return;
            }
        }
    }
}
