//! The break state machine
//!
//! Owns every countdown and the current/pending state. The machine only moves
//! forward when its own task completes: each step decides what happens next and
//! arms the next task through [`BreakStateMachine::change_state`]. A step that
//! does not re-arm parks the machine until a control operation moves it again.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::countdowns::{ActiveSurfaces, Countdowns};
use super::resume::{plan_resume, ResumePlan};
use super::status::{secs, tooltip, StatusSnapshot};
use crate::{
    services::{
        ActivityProbe, Announcement, BreakDecision, DisplayEnumerator, FullscreenProbe, SurfaceEvent,
        SurfaceId, SurfaceKind, WindowFactory,
    },
    settings::{ConfigSnapshot, Correction, Settings, SettingsStore, ShutdownSnapshot, Statistics},
    tasks::{TaskScheduler, TaskTarget},
    units::{minutes, seconds, Millis},
};

/// Task name the machine schedules itself under.
pub const MACHINE_TASK: &str = "break-machine";

pub const IDLE_TICK: Millis = 1000;
pub const SUSPENDED_TICK: Millis = 500;
/// Suspended cadence when both break kinds are disabled
pub const DISABLED_TICK: Millis = 300;
pub const AUTO_RELAX_TICK: Millis = 500;
pub const RELAXING_TICK: Millis = 1000;
pub const FIRST_LAUNCH_DELAY: Millis = 1000;
pub const DESTROY_DELAY: Millis = 50;
pub const START_BIG_PAUSE_HOP: Millis = 100;
pub const STRICT_RETRY: Millis = 2000;
pub const WAITING_RECHECK: Millis = 3000;

pub const AUTO_RELAX_AFTER: Millis = minutes(5);
/// Below this the big pause asks for confirmation instead of counting down.
pub const CONFIRMATION_THRESHOLD: Millis = seconds(10);
pub const POSTPONE_DEFERRAL: Millis = minutes(3);
pub const MIN_PAUSE_TIME: Millis = seconds(91);
pub const WAITING_SHOW_FROM: Millis = minutes(5);
pub const WAITING_SHOW_UNTIL: Millis = minutes(6);
pub const WAITING_GIVE_UP: Millis = minutes(8);
/// Skipping with more than this share of the break left counts as early.
pub const EARLY_SKIP_SHARE: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakState {
    FirstLaunch,
    Idle,
    Suspended,
    WaitingScreen,
    StartBigPause,
    AutoRelax,
    Relaxing,
    Destroy,
}

/// Everything outside the machine it talks to.
pub struct Collaborators {
    pub scheduler: Arc<dyn TaskScheduler>,
    pub activity: Box<dyn ActivityProbe>,
    pub fullscreen: Box<dyn FullscreenProbe>,
    pub displays: Box<dyn DisplayEnumerator>,
    pub windows: Box<dyn WindowFactory>,
    pub store: Box<dyn SettingsStore>,
}

pub struct BreakStateMachine {
    settings: Settings,
    statistics: Statistics,
    shutdown: ShutdownSnapshot,
    countdowns: Countdowns,
    state: BreakState,
    next: Option<BreakState>,
    last_delay: Millis,
    /// Postponements since the last restart of the big interval
    postpone_count: u32,
    warning_shown: bool,
    multiplier: Millis,
    surfaces: ActiveSurfaces,
    exit_requested: bool,
    shutdown_written: bool,
    collaborators: Collaborators,
    status_tx: watch::Sender<StatusSnapshot>,
}

fn bump(counter: &mut u32) {
    *counter = counter.saturating_add(1);
}

impl BreakStateMachine {
    /// Load the persisted configuration, falling back to defaults.
    pub fn new(collaborators: Collaborators) -> Self {
        let loaded = collaborators.store.load();
        let found = loaded.is_some();
        let snapshot = loaded.unwrap_or_default();
        let (status_tx, _) = watch::channel(StatusSnapshot::new());

        let mut machine = Self {
            settings: snapshot.settings,
            statistics: snapshot.statistics,
            shutdown: snapshot.shutdown,
            countdowns: Countdowns::default(),
            state: BreakState::Idle,
            next: None,
            last_delay: IDLE_TICK,
            postpone_count: 0,
            warning_shown: false,
            multiplier: 1,
            surfaces: ActiveSurfaces::default(),
            exit_requested: false,
            shutdown_written: false,
            collaborators,
            status_tx,
        };

        if found {
            machine.check_settings();
        } else {
            info!("No saved settings, starting from defaults");
        }
        machine
    }

    /// Speed up every countdown; 1 is real time.
    pub fn set_time_multiplier(&mut self, multiplier: u32) {
        self.multiplier = Millis::from(multiplier.max(1));
        if self.multiplier > 1 {
            warn!("Countdowns run {}x faster than real time", self.multiplier);
        }
    }

    /// Arm the first step: the welcome on a first launch, otherwise resume or
    /// start fresh depending on the last shutdown.
    pub fn start(&mut self, now: DateTime<Local>) {
        self.collaborators.activity.install();

        if self.statistics.first_launch {
            self.change_state(BreakState::FirstLaunch, FIRST_LAUNCH_DELAY);
        } else {
            match plan_resume(&self.shutdown, now).floored() {
                ResumePlan::Fresh => self.apply_settings(),
                ResumePlan::Resume { big, mini } => {
                    info!("Resuming countdowns after a short shutdown");
                    self.set_big_pause_time(big);
                    match mini {
                        Some(mini) => self.set_mini_pause_time(mini),
                        None => self.restart_mini_pause_interval(),
                    }
                }
            }
            self.collaborators.windows.announce(Announcement::Monitoring {
                big_pause_left: self.countdowns.time_to_big_pause,
            });
        }
        self.publish_status();
    }

    /// Record the pending state and ask for a completion after `delay`.
    pub fn change_state(&mut self, next: BreakState, delay: Millis) {
        self.last_delay = delay;
        self.next = Some(next);
        self.collaborators.scheduler.schedule(MACHINE_TASK, delay);
    }

    fn repeat_state(&mut self) {
        self.change_state(self.state, self.last_delay);
    }

    /// One step of the machine, run when its task completes.
    pub fn execute_task(&mut self, elapsed: Millis) {
        let Some(next) = self.next.take() else {
            warn!("Machine task completed with no pending state");
            return;
        };
        self.state = next;
        let elapsed = elapsed.saturating_mul(self.multiplier);

        match self.state {
            BreakState::FirstLaunch => self.step_first_launch(),
            BreakState::Idle => self.step_idle(elapsed),
            BreakState::Suspended => self.step_suspended(elapsed),
            BreakState::WaitingScreen => self.step_waiting_screen(elapsed),
            BreakState::StartBigPause => self.step_start_big_pause(),
            BreakState::AutoRelax => self.step_auto_relax(elapsed),
            BreakState::Relaxing => self.step_relaxing(elapsed),
            BreakState::Destroy => self.request_exit(),
        }

        self.publish_status();
    }

    fn step_first_launch(&mut self) {
        self.collaborators.windows.announce(Announcement::FirstLaunch {
            big_pause_interval: self.settings.big_pause_interval_ms(),
        });
        self.statistics.first_launch = false;
        self.save();
        self.apply_settings();
    }

    fn step_idle(&mut self, elapsed: Millis) {
        if !self.settings.big_pause_enabled && !self.settings.mini_pause_enabled {
            self.change_state(BreakState::Suspended, DISABLED_TICK);
            return;
        }

        self.repeat_state();
        self.check_settings();

        if self.collaborators.activity.poll_movement() {
            self.countdowns.inactivity = 0;
        } else {
            self.countdowns.inactivity += elapsed;
            if self.countdowns.inactivity >= AUTO_RELAX_AFTER {
                self.auto_relax();
            }
        }

        if self.settings.big_pause_enabled && self.countdowns.time_to_big_pause > 0 {
            self.countdowns.time_to_big_pause -= elapsed;

            let lead = self.warning_lead();
            let big = self.countdowns.time_to_big_pause;
            if lead > 0
                && big <= lead
                && big > CONFIRMATION_THRESHOLD
                && !self.surfaces.any(SurfaceKind::Notification)
                && !self.warning_shown
            {
                self.open_warning(lead);
            }

            if self.countdowns.time_to_big_pause <= CONFIRMATION_THRESHOLD {
                self.change_state(BreakState::StartBigPause, START_BIG_PAUSE_HOP);
            }
        }

        if self.settings.mini_pause_enabled && self.countdowns.time_to_mini_pause > 0 {
            self.countdowns.time_to_mini_pause -= elapsed;

            let big = self.countdowns.time_to_big_pause;
            // no mini pause right before a long one
            let big_far = big == 0 || big > self.settings.mini_pause_interval_ms() / 2;
            if big_far && self.countdowns.time_to_mini_pause <= 0 {
                self.start_mini_pause();
                self.save();
            }
        }
    }

    fn warning_lead(&self) -> Millis {
        if self.settings.warning_enabled {
            self.settings.warning_lead_ms()
        } else {
            0
        }
    }

    /// Countdown notification, only if some display is not taken by a
    /// fullscreen application.
    fn open_warning(&mut self, lead: Millis) {
        let blocked = self.collaborators.fullscreen.query().map(|b| b.display);
        let free = (0..self.collaborators.displays.count()).any(|d| Some(d) != blocked);
        if !free {
            return;
        }

        self.countdowns.time_to_big_pause = lead;
        let surface = self.collaborators.windows.open_notification(lead);
        self.surfaces.insert(surface);
        self.warning_shown = true;
        debug!("Warning notification opened");
    }

    fn step_suspended(&mut self, elapsed: Millis) {
        self.repeat_state();

        self.countdowns.inactivity -= elapsed;
        if self.countdowns.inactivity <= 0 {
            self.collaborators.windows.announce(Announcement::ResumedAfterPause);
            self.restart_big_pause_interval();
            self.restart_mini_pause_interval();
            self.save();
        }
    }

    fn step_waiting_screen(&mut self, elapsed: Millis) {
        self.repeat_state();

        self.countdowns.fullscreen_block_duration += elapsed;
        let blocked_for = self.countdowns.fullscreen_block_duration;

        if (WAITING_SHOW_FROM..WAITING_SHOW_UNTIL).contains(&blocked_for) {
            self.show_waiting();
        }

        if blocked_for >= WAITING_GIVE_UP {
            info!("Fullscreen application kept the long break away for too long, cancelling it");
            self.close_kind(SurfaceKind::Waiting);
            self.restart_big_pause_interval();
            self.save();
        } else if self.collaborators.fullscreen.query().is_some() {
            self.change_state(BreakState::WaitingScreen, WAITING_RECHECK);
        } else {
            self.close_kind(SurfaceKind::Waiting);
            self.change_state(BreakState::StartBigPause, WAITING_RECHECK);
        }
    }

    fn step_start_big_pause(&mut self) {
        let block = self.collaborators.fullscreen.query();

        if self.settings.strict_mode_enabled {
            match block {
                Some(block) => {
                    let minimized = self.collaborators.fullscreen.force_minimize(block.window);
                    debug!("Strict mode minimized {:?}: {}", block.window, minimized);
                    self.change_state(BreakState::StartBigPause, STRICT_RETRY);
                }
                None => self.start_big_pause(),
            }
        } else if block.is_none() {
            self.ask_for_big_pause();
        } else {
            self.show_waiting();
            self.countdowns.fullscreen_block_duration = 0;
            self.change_state(BreakState::WaitingScreen, IDLE_TICK);
        }
    }

    fn step_auto_relax(&mut self, elapsed: Millis) {
        self.repeat_state();

        self.countdowns.inactivity += elapsed;
        if self.collaborators.activity.poll_movement() {
            self.on_user_activity();
        }
    }

    fn step_relaxing(&mut self, elapsed: Millis) {
        self.countdowns.relaxing_time_left -= elapsed;

        if self.countdowns.relaxing_time_left < 0 {
            if self.settings.sounds_enabled {
                self.collaborators.windows.chime();
            }
            self.stop_big_pause();
        } else {
            self.repeat_state();
        }
    }

    pub fn restart_big_pause_interval(&mut self) {
        debug!("Restarting big pause interval");
        self.postpone_count = 0;
        self.countdowns.inactivity = 0;
        self.warning_shown = false;
        self.countdowns.time_to_big_pause = if self.settings.big_pause_enabled {
            self.settings.big_pause_interval_ms()
        } else {
            0
        };
        self.change_state(BreakState::Idle, IDLE_TICK);
    }

    pub fn restart_mini_pause_interval(&mut self) {
        self.countdowns.time_to_mini_pause = if self.settings.mini_pause_enabled {
            self.settings.mini_pause_interval_ms()
        } else {
            0
        };
    }

    /// Set the big countdown, kept within [91 s, configured duration].
    pub fn set_big_pause_time(&mut self, ms: Millis) {
        self.postpone_count = 0;
        self.countdowns.inactivity = 0;

        let ceiling = self.settings.big_pause_duration_ms();
        let ms = if ms < MIN_PAUSE_TIME {
            MIN_PAUSE_TIME
        } else if ms > ceiling {
            warn!("Big pause time {}ms is above the {}ms duration, lowering it", ms, ceiling);
            ceiling
        } else {
            ms
        };

        self.countdowns.time_to_big_pause = if self.settings.big_pause_enabled { ms } else { 0 };
        self.change_state(BreakState::Idle, IDLE_TICK);
    }

    pub fn set_mini_pause_time(&mut self, ms: Millis) {
        let ms = ms.max(MIN_PAUSE_TIME);
        self.countdowns.time_to_mini_pause = if self.settings.mini_pause_enabled { ms } else { 0 };
    }

    pub fn apply_settings(&mut self) {
        self.restart_big_pause_interval();
        self.restart_mini_pause_interval();
    }

    /// Pull the configuration and the running countdowns back into range.
    pub fn check_settings(&mut self) -> Vec<Correction> {
        let mut corrections = self.settings.clamp();

        let big_max = self.settings.big_pause_interval_ms();
        if self.countdowns.time_to_big_pause > big_max {
            corrections.push(Correction::new(
                "time_to_big_pause",
                self.countdowns.time_to_big_pause as f64,
                big_max as f64,
            ));
            self.countdowns.time_to_big_pause = big_max;
        }

        let mini_max = self.settings.mini_pause_interval_ms();
        if self.countdowns.time_to_mini_pause > mini_max {
            corrections.push(Correction::new(
                "time_to_mini_pause",
                self.countdowns.time_to_mini_pause as f64,
                mini_max as f64,
            ));
            self.countdowns.time_to_mini_pause = mini_max;
        }

        for correction in &corrections {
            warn!("{}", correction);
        }
        corrections
    }

    /// Open break surfaces on every display, or wait out a fullscreen
    /// application first.
    pub fn start_big_pause(&mut self) {
        if self.surfaces.any(SurfaceKind::BigBreak) {
            return;
        }

        info!("Starting long break");
        self.warning_shown = false;

        if self.collaborators.fullscreen.query().is_none() {
            bump(&mut self.statistics.long_break_count);
            self.stop_mini_pause();

            let duration = self.settings.big_pause_duration;
            for display in 0..self.collaborators.displays.count() {
                let surface = self.collaborators.windows.open_break(display, duration * 60);
                self.surfaces.insert(surface);
            }

            self.countdowns.relaxing_time_left = self.settings.big_pause_duration_ms();
            self.change_state(BreakState::Relaxing, RELAXING_TICK);
        } else {
            info!("Fullscreen application is running, waiting before the long break");
            self.show_waiting();
            self.countdowns.fullscreen_block_duration = 0;
            self.change_state(BreakState::WaitingScreen, IDLE_TICK);
        }
    }

    /// Ask the user before starting the break. The machine waits for the answer.
    pub fn ask_for_big_pause(&mut self) {
        let surface = self.collaborators.windows.open_confirmation(0, self.postpone_count);
        self.surfaces.insert(surface);
    }

    /// Confirmation accepted.
    pub fn accept_big_pause(&mut self) -> bool {
        if !self.close_kind(SurfaceKind::Confirmation) {
            debug!("No break confirmation open, ignoring accept");
            return false;
        }
        self.start_big_pause();
        true
    }

    pub fn postpone_big_pause(&mut self) -> bool {
        if !self.close_kind(SurfaceKind::Confirmation) {
            debug!("No break confirmation open, ignoring postpone");
            return false;
        }

        info!("Long break postponed");
        self.warning_shown = false;
        bump(&mut self.statistics.postpone_count);
        self.postpone_count = self.postpone_count.saturating_add(1);
        self.countdowns.inactivity = 0;
        self.countdowns.time_to_big_pause = POSTPONE_DEFERRAL;
        self.countdowns.time_to_mini_pause = 0;
        self.change_state(BreakState::Idle, IDLE_TICK);
        true
    }

    pub fn refuse_big_pause(&mut self) -> bool {
        if !self.close_kind(SurfaceKind::Confirmation) {
            debug!("No break confirmation open, ignoring refuse");
            return false;
        }

        info!("Long break refused");
        bump(&mut self.statistics.refuse_count);
        self.restart_big_pause_interval();
        self.restart_mini_pause_interval();
        self.save();
        true
    }

    /// Skip button on a break surface.
    pub fn skip_big_pause(&mut self) -> bool {
        if !self.surfaces.any(SurfaceKind::BigBreak) {
            debug!("No long break running, ignoring skip");
            return false;
        }

        let full = self.settings.big_pause_duration_ms();
        let early_threshold = (full as f64 * EARLY_SKIP_SHARE) as Millis;
        if self.countdowns.relaxing_time_left > early_threshold {
            bump(&mut self.statistics.early_skip_count);
        } else {
            bump(&mut self.statistics.late_skip_count);
        }

        self.stop_big_pause();
        true
    }

    pub fn stop_big_pause(&mut self) {
        info!("Long break over");
        self.close_kind(SurfaceKind::BigBreak);
        self.restart_big_pause_interval();
        self.restart_mini_pause_interval();
        self.save();
    }

    /// The user left the machine alone long enough to count as a break.
    pub fn auto_relax(&mut self) {
        info!("No activity for a while, relaxing automatically");
        self.collaborators.activity.reinstall();

        self.countdowns.inactivity = 0;
        self.countdowns.time_to_big_pause = 0;
        self.countdowns.time_to_mini_pause = 0;
        bump(&mut self.statistics.auto_break_count);
        self.change_state(BreakState::AutoRelax, AUTO_RELAX_TICK);
    }

    /// Restarts the mini interval even when surfaces were already open.
    pub fn start_mini_pause(&mut self) {
        if !self.surfaces.any(SurfaceKind::MiniBreak) {
            bump(&mut self.statistics.short_break_count);

            let number = self.statistics.short_break_count;
            let duration = self.settings.mini_pause_duration;
            for display in 0..self.collaborators.displays.count() {
                let surface = self.collaborators.windows.open_mini_break(display, number, duration * 60);
                self.surfaces.insert(surface);
            }
            info!("Mini break #{}", number);
        } else {
            warn!("Mini break surfaces still open, not opening new ones");
        }

        self.restart_mini_pause_interval();
    }

    pub fn stop_mini_pause(&mut self) {
        self.close_kind(SurfaceKind::MiniBreak);
        self.restart_mini_pause_interval();
    }

    pub fn on_user_activity(&mut self) {
        if self.next == Some(BreakState::Suspended) {
            return;
        }

        self.countdowns.inactivity = 0;

        if self.next == Some(BreakState::AutoRelax) {
            info!("User is back, auto-relax ended");
            self.apply_settings();
            self.collaborators.windows.announce(Announcement::AutoRelaxEnded {
                big_pause_left: self.countdowns.time_to_big_pause,
            });
        }
    }

    /// Pause monitoring for `minutes`, or resume it when already paused.
    pub fn toggle_paused_mode(&mut self, pause_minutes: i64) {
        match self.next {
            Some(BreakState::Idle) => {
                info!("Pausing break monitoring for {} minutes", pause_minutes);
                self.countdowns.inactivity = minutes(pause_minutes);
                self.change_state(BreakState::Suspended, SUSPENDED_TICK);
                self.close_kind(SurfaceKind::Notification);
            }
            Some(BreakState::Suspended) => {
                info!("Resuming break monitoring");
                self.restart_big_pause_interval();
                self.restart_mini_pause_interval();
                self.save();
            }
            other => info!("Cannot toggle pause while {:?} is pending", other),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.next == Some(BreakState::Suspended)
    }

    pub fn take_long_break_now(&mut self) {
        if matches!(
            self.next,
            Some(BreakState::Idle | BreakState::AutoRelax | BreakState::Relaxing)
        ) {
            self.start_big_pause();
        }

        self.close_kind(SurfaceKind::Notification);
        self.close_kind(SurfaceKind::Waiting);
    }

    /// Settings window closed with `settings`.
    pub fn apply_edited_settings(&mut self, settings: Settings) {
        info!("Applying edited settings");
        self.settings = settings;
        self.statistics.seen_settings = true;
        // also shortens countdowns longer than the new intervals
        self.check_settings();

        if self.settings.big_pause_enabled {
            if self.countdowns.time_to_big_pause == 0 {
                self.restart_big_pause_interval();
            }
        } else {
            self.countdowns.time_to_big_pause = 0;
        }

        if self.settings.mini_pause_enabled {
            if self.countdowns.time_to_mini_pause == 0 {
                self.restart_mini_pause_interval();
                if self.next == Some(BreakState::Suspended) {
                    self.change_state(BreakState::Idle, IDLE_TICK);
                }
            }
        } else {
            self.countdowns.time_to_mini_pause = 0;
        }

        debug!(
            "Countdowns after settings edit: big {}ms, mini {}ms",
            self.countdowns.time_to_big_pause, self.countdowns.time_to_mini_pause
        );
        self.save();
    }

    /// Close open break surfaces first, then ask the process to exit.
    pub fn request_exit(&mut self) {
        if self.surfaces.any(SurfaceKind::MiniBreak) {
            self.close_kind(SurfaceKind::MiniBreak);
            self.change_state(BreakState::Destroy, DESTROY_DELAY);
            return;
        }

        self.close_kind(SurfaceKind::BigBreak);
        self.exit_requested = true;
    }

    /// Whether an exit was requested since the last call.
    pub fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }

    /// Write the shutdown snapshot. Only the first call has an effect.
    pub fn prepare_shutdown(&mut self, now: DateTime<Local>) {
        if self.shutdown_written {
            return;
        }
        self.shutdown_written = true;

        self.shutdown.last_shutdown = Some(now);
        self.save();
        self.collaborators.activity.uninstall();
        info!("Shutdown snapshot written");
    }

    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Closed(id) => self.on_surface_closed(id),
            SurfaceEvent::Decision(BreakDecision::Accept) => {
                self.accept_big_pause();
            }
            SurfaceEvent::Decision(BreakDecision::Postpone) => {
                self.postpone_big_pause();
            }
            SurfaceEvent::Decision(BreakDecision::Refuse) => {
                self.refuse_big_pause();
            }
            SurfaceEvent::Decision(BreakDecision::Skip) => {
                self.skip_big_pause();
            }
        }
        self.publish_status();
    }

    pub fn on_surface_closed(&mut self, id: SurfaceId) {
        if let Some(surface) = self.surfaces.remove(id) {
            debug!("{:?} surface {:?} closed", surface.kind, surface.id);
        }
    }

    /// Close every open surface of `kind`. Returns whether there was any.
    fn close_kind(&mut self, kind: SurfaceKind) -> bool {
        let closing = self.surfaces.take(kind);
        for surface in &closing {
            self.collaborators.windows.close(surface);
        }
        !closing.is_empty()
    }

    /// Waiting surfaces on every display without the fullscreen application.
    fn show_waiting(&mut self) {
        if self.surfaces.any(SurfaceKind::Waiting) {
            return;
        }

        let blocked = self.collaborators.fullscreen.query().map(|b| b.display);
        for display in 0..self.collaborators.displays.count() {
            if Some(display) == blocked {
                continue;
            }
            let surface = self.collaborators.windows.open_waiting(display);
            self.surfaces.insert(surface);
        }
    }

    fn save(&mut self) {
        let (big, mini) = ShutdownSnapshot::capture(
            self.countdowns.time_to_big_pause,
            self.countdowns.time_to_mini_pause,
        );
        self.shutdown.last_big_pause_time_left = big;
        self.shutdown.last_mini_pause_time_left = mini;

        let snapshot = self.snapshot();
        if let Err(e) = self.collaborators.store.save(&snapshot) {
            error!("Failed to save settings: {}", e);
        }
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            settings: self.settings.clone(),
            statistics: self.statistics.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state,
            next: self.next,
            paused: self.is_paused(),
            big_pause_left_secs: secs(self.countdowns.time_to_big_pause),
            mini_pause_left_secs: secs(self.countdowns.time_to_mini_pause),
            inactivity_secs: secs(self.countdowns.inactivity),
            relaxing_left_secs: secs(self.countdowns.relaxing_time_left),
            tooltip: tooltip(
                self.next,
                self.settings.big_pause_enabled,
                self.countdowns.time_to_big_pause,
                self.countdowns.inactivity,
            ),
        }
    }

    pub fn publish_status(&self) {
        self.status_tx.send_replace(self.status());
    }

    pub fn subscribe_status(&self) -> watch::Receiver<StatusSnapshot> {
        self.status_tx.subscribe()
    }

    pub fn state(&self) -> BreakState {
        self.state
    }

    pub fn next_state(&self) -> Option<BreakState> {
        self.next
    }

    pub fn countdowns(&self) -> Countdowns {
        self.countdowns
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn postpone_count(&self) -> u32 {
        self.postpone_count
    }

    pub fn surfaces(&self) -> &ActiveSurfaces {
        &self.surfaces
    }
}

impl TaskTarget for BreakStateMachine {
    fn on_task_complete(&mut self, _progress: f32, elapsed: Millis) {
        self.execute_task(elapsed);
    }
}
