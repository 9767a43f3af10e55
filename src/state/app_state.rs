//! Main application state management

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Instant,
};
use chrono::{DateTime, Local};
use tokio::sync::{watch, Notify};
use tracing::{debug, error, info, warn};

use super::{BreakStateMachine, StatusSnapshot, MACHINE_TASK};
use crate::{
    services::{ActivitySignal, SurfaceEvent},
    tasks::{CompletionEvent, SharedTarget, TargetRegistry, TaskManager},
};

/// What happened to a completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// Shutdown already began
    Finished,
    /// Superseded by a newer request for the same target
    Stale,
    UnknownTarget,
}

/// Owning context shared by the dispatcher and the control API
pub struct AppState {
    /// The break machine, also registered as a task target
    pub machine: Arc<Mutex<BreakStateMachine>>,
    pub registry: Arc<TargetRegistry>,
    pub tasks: TaskManager,
    /// Activity reported over the control API
    pub activity: ActivitySignal,
    /// Status published after every machine step
    pub status_rx: watch::Receiver<StatusSnapshot>,
    /// Woken when the machine asks the process to exit
    pub shutdown: Notify,
    finished: AtomicBool,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Wrap the machine and register it under [`MACHINE_TASK`].
    pub fn new(
        machine: BreakStateMachine,
        registry: Arc<TargetRegistry>,
        tasks: TaskManager,
        activity: ActivitySignal,
        host: String,
        port: u16,
    ) -> Self {
        let status_rx = machine.subscribe_status();
        let machine = Arc::new(Mutex::new(machine));

        let target: SharedTarget = machine.clone();
        registry.register(MACHINE_TASK, target);

        Self {
            machine,
            registry,
            tasks,
            activity,
            status_rx,
            shutdown: Notify::new(),
            finished: AtomicBool::new(false),
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Run `f` on the machine, then publish its status and forward an exit request.
    pub fn with_machine<R, F>(&self, f: F) -> Result<R, String>
    where
        F: FnOnce(&mut BreakStateMachine) -> R,
    {
        let mut machine = self.machine.lock()
            .map_err(|e| format!("Failed to lock break machine: {}", e))?;

        let result = f(&mut machine);
        machine.publish_status();
        let exit = machine.take_exit_request();
        drop(machine);

        if exit {
            info!("Exit requested");
            self.shutdown.notify_one();
        }
        Ok(result)
    }

    /// Hand a completion event to its target.
    pub fn dispatch(&self, event: &CompletionEvent) -> DispatchOutcome {
        if self.is_finished() {
            debug!("Shutting down, dropping completion for {}", event.target);
            return DispatchOutcome::Finished;
        }

        if !self.tasks.is_current(event) {
            warn!("Dropping stale completion for {} (token {})", event.target, event.token);
            return DispatchOutcome::Stale;
        }

        let Some(target) = self.registry.get(&event.target) else {
            debug!("No task target named {}", event.target);
            return DispatchOutcome::UnknownTarget;
        };

        let mut guard = target.lock().unwrap_or_else(PoisonError::into_inner);
        // Targets only reschedule while locked, so this answer is final.
        if !self.tasks.is_current(event) {
            warn!("Completion for {} (token {}) superseded while waiting", event.target, event.token);
            return DispatchOutcome::Stale;
        }
        guard.on_task_complete(event.progress(), event.elapsed_ms());
        drop(guard);

        if event.target == MACHINE_TASK {
            self.forward_exit_request();
        }
        DispatchOutcome::Delivered
    }

    /// Hand a surface callback to the machine.
    pub fn handle_surface_event(&self, event: SurfaceEvent) {
        if self.is_finished() {
            return;
        }
        if let Err(e) = self.with_machine(|machine| machine.handle_surface_event(event)) {
            error!("Failed to deliver {:?}: {}", event, e);
        }
    }

    fn forward_exit_request(&self) {
        let exit = self.machine
            .lock()
            .map(|mut machine| machine.take_exit_request())
            .unwrap_or(false);

        if exit {
            info!("Exit requested");
            self.shutdown.notify_one();
        }
    }

    /// Write the shutdown snapshot and stop the task manager. Runs once.
    pub fn shutdown_core(&self, now: DateTime<Local>) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.machine.lock() {
            Ok(mut machine) => machine.prepare_shutdown(now),
            Err(e) => error!("Failed to lock break machine for shutdown: {}", e),
        }
        self.tasks.stop();
        info!("Break machine shut down");
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Latest published status
    pub fn get_status(&self) -> StatusSnapshot {
        self.status_rx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
