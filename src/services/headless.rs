//! Headless surfaces
//!
//! Surfaces are logged instead of drawn. Surfaces with a lifetime (mini breaks,
//! the warning countdown, the confirmation prompt) count themselves down through
//! the task manager and report back when they close.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::windows::{
    Announcement, BreakDecision, SurfaceEvent, SurfaceHandle, SurfaceId, SurfaceKind, WindowFactory,
};
use crate::{
    tasks::{TargetRegistry, TaskScheduler, TaskTarget},
    units::{format_countdown, seconds, Millis},
};

/// How long the confirmation prompt waits before starting the break itself.
pub const CONFIRMATION_TIMEOUT: Millis = seconds(10);
/// Surfaces count down in steps of at most this.
const SURFACE_TICK: Millis = seconds(1);

pub fn surface_task_name(id: SurfaceId) -> String {
    format!("surface-{}", id.0)
}

/// `WindowFactory` without a display server.
pub struct HeadlessWindows {
    scheduler: Arc<dyn TaskScheduler>,
    registry: Arc<TargetRegistry>,
    events: UnboundedSender<SurfaceEvent>,
    next_id: u64,
}

impl HeadlessWindows {
    pub fn new(
        scheduler: Arc<dyn TaskScheduler>,
        registry: Arc<TargetRegistry>,
        events: UnboundedSender<SurfaceEvent>,
    ) -> Self {
        Self {
            scheduler,
            registry,
            events,
            next_id: 0,
        }
    }

    fn handle(&mut self, kind: SurfaceKind, display: Option<usize>) -> SurfaceHandle {
        self.next_id += 1;
        SurfaceHandle {
            id: SurfaceId(self.next_id),
            kind,
            display,
        }
    }

    /// Register a surface that closes itself after `lifetime`.
    fn start_countdown(&self, handle: &SurfaceHandle, lifetime: Millis, on_expire: Option<BreakDecision>) {
        let name = surface_task_name(handle.id);
        let surface = CountdownSurface {
            handle: handle.clone(),
            remaining: lifetime,
            on_expire,
            scheduler: Arc::clone(&self.scheduler),
            registry: Arc::clone(&self.registry),
            events: self.events.clone(),
        };

        self.registry.register(name.clone(), Arc::new(Mutex::new(surface)));
        self.scheduler.schedule(&name, lifetime.min(SURFACE_TICK));
    }
}

impl WindowFactory for HeadlessWindows {
    fn open_break(&mut self, index: usize, duration_secs: i64) -> SurfaceHandle {
        let handle = self.handle(SurfaceKind::BigBreak, Some(index));
        info!(
            "Break surface {:?} on display {} for {}",
            handle.id,
            index,
            format_countdown(seconds(duration_secs))
        );
        handle
    }

    fn open_mini_break(&mut self, index: usize, break_number: u32, duration_secs: i64) -> SurfaceHandle {
        let handle = self.handle(SurfaceKind::MiniBreak, Some(index));
        info!("Mini break #{} surface {:?} on display {}", break_number, handle.id, index);
        self.start_countdown(&handle, seconds(duration_secs), None);
        handle
    }

    fn open_waiting(&mut self, index: usize) -> SurfaceHandle {
        let handle = self.handle(SurfaceKind::Waiting, Some(index));
        info!("Waiting for fullscreen app to finish, surface {:?} on display {}", handle.id, index);
        handle
    }

    fn open_notification(&mut self, lead: Millis) -> SurfaceHandle {
        let handle = self.handle(SurfaceKind::Notification, None);
        info!("Long break in {}", format_countdown(lead));
        self.start_countdown(&handle, lead, None);
        handle
    }

    fn open_confirmation(&mut self, display: usize, postpone_count: u32) -> SurfaceHandle {
        let handle = self.handle(SurfaceKind::Confirmation, Some(display));
        info!(
            "Time for a long break (postponed {} times), starting in {}",
            postpone_count,
            format_countdown(CONFIRMATION_TIMEOUT)
        );
        self.start_countdown(&handle, CONFIRMATION_TIMEOUT, Some(BreakDecision::Accept));
        handle
    }

    fn close(&mut self, surface: &SurfaceHandle) {
        let name = surface_task_name(surface.id);
        if self.registry.unregister(&name) {
            self.scheduler.cancel(&name);
        }
        debug!("Closed {:?} surface {:?}", surface.kind, surface.id);
    }

    fn announce(&mut self, announcement: Announcement) {
        match announcement {
            Announcement::FirstLaunch { big_pause_interval } => info!(
                "Welcome! Your first long break is in {}",
                format_countdown(big_pause_interval)
            ),
            Announcement::ResumedAfterPause => info!("Pause is over, break monitoring resumed"),
            Announcement::AutoRelaxEnded { big_pause_left } => info!(
                "Welcome back! Next long break in {}",
                format_countdown(big_pause_left)
            ),
            Announcement::Monitoring { big_pause_left } => {
                info!("Monitoring started, next long break in {}", format_countdown(big_pause_left))
            }
        }
    }

    fn chime(&mut self) {
        info!("Break over");
    }
}

struct CountdownSurface {
    handle: SurfaceHandle,
    remaining: Millis,
    on_expire: Option<BreakDecision>,
    scheduler: Arc<dyn TaskScheduler>,
    registry: Arc<TargetRegistry>,
    events: UnboundedSender<SurfaceEvent>,
}

impl TaskTarget for CountdownSurface {
    fn on_task_complete(&mut self, _progress: f32, elapsed: Millis) {
        let name = surface_task_name(self.handle.id);
        self.remaining -= elapsed;

        if self.remaining > 0 {
            self.scheduler.schedule(&name, self.remaining.min(SURFACE_TICK));
            return;
        }

        debug!("{:?} surface {:?} expired", self.handle.kind, self.handle.id);
        self.registry.unregister(&name);
        self.scheduler.cancel(&name);

        if let Some(decision) = self.on_expire {
            if self.events.send(SurfaceEvent::Decision(decision)).is_err() {
                warn!("Surface event queue closed, dropping {:?}", decision);
            }
        }
        if self.events.send(SurfaceEvent::Closed(self.handle.id)).is_err() {
            warn!("Surface event queue closed, dropping close of {:?}", self.handle.id);
        }
    }
}
