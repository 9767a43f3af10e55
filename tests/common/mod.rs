//! Fake collaborators shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use eyerest::{
    error::SettingsError,
    services::{
        ActivityProbe, ActivitySignal, Announcement, DisplayEnumerator, FixedDisplays, FullscreenBlock, FullscreenProbe,
        SurfaceHandle, SurfaceId, SurfaceKind, WindowFactory, WindowHandle,
    },
    settings::{ConfigSnapshot, Settings, SettingsStore, Statistics},
    state::{AppState, BreakStateMachine, Collaborators},
    tasks::{CompletionEvent, TargetRegistry, TaskManager, TaskScheduler, DEFAULT_RESOLUTION},
    units::Millis,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Records every schedule request instead of arming a timer.
#[derive(Default)]
pub struct RecordingScheduler {
    calls: Mutex<Vec<(String, Millis)>>,
}

impl RecordingScheduler {
    pub fn last(&self) -> Option<(String, Millis)> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl TaskScheduler for RecordingScheduler {
    fn schedule(&self, target: &str, delay: Millis) {
        self.calls.lock().unwrap().push((target.to_string(), delay));
    }
}

#[derive(Debug, Default)]
pub struct ActivityLog {
    /// Reported on every poll until changed
    pub moving: bool,
    pub polls: u32,
    pub reinstalls: u32,
}

#[derive(Clone, Default)]
pub struct FakeActivity(pub Arc<Mutex<ActivityLog>>);

impl FakeActivity {
    pub fn set_moving(&self, moving: bool) {
        self.0.lock().unwrap().moving = moving;
    }

    pub fn reinstalls(&self) -> u32 {
        self.0.lock().unwrap().reinstalls
    }
}

impl ActivityProbe for FakeActivity {
    fn poll_movement(&mut self) -> bool {
        let mut log = self.0.lock().unwrap();
        log.polls += 1;
        log.moving
    }

    fn reinstall(&mut self) {
        self.0.lock().unwrap().reinstalls += 1;
    }
}

#[derive(Debug, Default)]
pub struct FullscreenLog {
    pub block: Option<FullscreenBlock>,
    pub minimized: Vec<WindowHandle>,
}

#[derive(Clone, Default)]
pub struct FakeFullscreen(pub Arc<Mutex<FullscreenLog>>);

impl FakeFullscreen {
    pub fn block(&self, display: usize, window: u64) {
        self.0.lock().unwrap().block = Some(FullscreenBlock {
            display,
            window: WindowHandle(window),
        });
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().block = None;
    }

    pub fn minimized(&self) -> Vec<WindowHandle> {
        self.0.lock().unwrap().minimized.clone()
    }
}

impl FullscreenProbe for FakeFullscreen {
    fn query(&self) -> Option<FullscreenBlock> {
        self.0.lock().unwrap().block
    }

    fn force_minimize(&mut self, window: WindowHandle) -> bool {
        self.0.lock().unwrap().minimized.push(window);
        true
    }
}

#[derive(Debug, Default)]
pub struct WindowLog {
    pub opened: Vec<SurfaceHandle>,
    pub closed: Vec<SurfaceId>,
    pub announcements: Vec<Announcement>,
    pub chimes: u32,
    next_id: u64,
}

impl WindowLog {
    pub fn opened_of(&self, kind: SurfaceKind) -> Vec<SurfaceHandle> {
        self.opened.iter().filter(|s| s.kind == kind).cloned().collect()
    }
}

/// Hands out surface ids and remembers what was opened and closed.
#[derive(Clone, Default)]
pub struct RecordingWindows(pub Arc<Mutex<WindowLog>>);

impl RecordingWindows {
    fn open(&mut self, kind: SurfaceKind, display: Option<usize>) -> SurfaceHandle {
        let mut log = self.0.lock().unwrap();
        log.next_id += 1;
        let handle = SurfaceHandle {
            id: SurfaceId(log.next_id),
            kind,
            display,
        };
        log.opened.push(handle.clone());
        handle
    }

    pub fn opened(&self, kind: SurfaceKind) -> Vec<SurfaceHandle> {
        self.0.lock().unwrap().opened_of(kind)
    }

    pub fn closed(&self) -> Vec<SurfaceId> {
        self.0.lock().unwrap().closed.clone()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        self.0.lock().unwrap().announcements.clone()
    }

    pub fn chimes(&self) -> u32 {
        self.0.lock().unwrap().chimes
    }
}

impl WindowFactory for RecordingWindows {
    fn open_break(&mut self, display: usize, _duration_secs: i64) -> SurfaceHandle {
        self.open(SurfaceKind::BigBreak, Some(display))
    }

    fn open_mini_break(&mut self, display: usize, _break_number: u32, _duration_secs: i64) -> SurfaceHandle {
        self.open(SurfaceKind::MiniBreak, Some(display))
    }

    fn open_waiting(&mut self, display: usize) -> SurfaceHandle {
        self.open(SurfaceKind::Waiting, Some(display))
    }

    fn open_notification(&mut self, _lead: Millis) -> SurfaceHandle {
        self.open(SurfaceKind::Notification, None)
    }

    fn open_confirmation(&mut self, display: usize, _postpone_count: u32) -> SurfaceHandle {
        self.open(SurfaceKind::Confirmation, Some(display))
    }

    fn close(&mut self, surface: &SurfaceHandle) {
        self.0.lock().unwrap().closed.push(surface.id);
    }

    fn announce(&mut self, announcement: Announcement) {
        self.0.lock().unwrap().announcements.push(announcement);
    }

    fn chime(&mut self) {
        self.0.lock().unwrap().chimes += 1;
    }
}

#[derive(Debug, Default)]
pub struct StoreLog {
    pub loaded: Option<ConfigSnapshot>,
    pub saved: Vec<ConfigSnapshot>,
}

#[derive(Clone, Default)]
pub struct MemoryStore(pub Arc<Mutex<StoreLog>>);

impl MemoryStore {
    pub fn with(snapshot: Option<ConfigSnapshot>) -> Self {
        Self(Arc::new(Mutex::new(StoreLog {
            loaded: snapshot,
            saved: Vec::new(),
        })))
    }

    pub fn last_saved(&self) -> Option<ConfigSnapshot> {
        self.0.lock().unwrap().saved.last().cloned()
    }

    pub fn save_count(&self) -> usize {
        self.0.lock().unwrap().saved.len()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Option<ConfigSnapshot> {
        self.0.lock().unwrap().loaded.clone()
    }

    fn save(&self, snapshot: &ConfigSnapshot) -> Result<(), SettingsError> {
        self.0.lock().unwrap().saved.push(snapshot.clone());
        Ok(())
    }
}

/// Every fake handle a test may want to inspect.
#[derive(Clone)]
pub struct Fakes {
    pub scheduler: Arc<RecordingScheduler>,
    pub activity: FakeActivity,
    pub fullscreen: FakeFullscreen,
    pub windows: RecordingWindows,
    pub store: MemoryStore,
}

impl Fakes {
    pub fn new(loaded: Option<ConfigSnapshot>) -> Self {
        Self {
            scheduler: Arc::new(RecordingScheduler::default()),
            activity: FakeActivity::default(),
            fullscreen: FakeFullscreen::default(),
            windows: RecordingWindows::default(),
            store: MemoryStore::with(loaded),
        }
    }

    /// Collaborators scheduling through `scheduler`.
    pub fn collaborators_with(&self, scheduler: Arc<dyn TaskScheduler>, displays: usize) -> Collaborators {
        let displays: Box<dyn DisplayEnumerator> = Box::new(FixedDisplays::new(displays));
        Collaborators {
            scheduler,
            activity: Box::new(self.activity.clone()),
            fullscreen: Box::new(self.fullscreen.clone()),
            displays,
            windows: Box::new(self.windows.clone()),
            store: Box::new(self.store.clone()),
        }
    }

    pub fn collaborators(&self, displays: usize) -> Collaborators {
        self.collaborators_with(self.scheduler.clone(), displays)
    }
}

/// Saved configuration of someone who already went through the first launch.
pub fn returning_user(settings: Settings) -> ConfigSnapshot {
    ConfigSnapshot {
        settings,
        statistics: Statistics {
            first_launch: false,
            ..Statistics::default()
        },
        ..ConfigSnapshot::default()
    }
}

/// A started machine with `displays` displays, monitoring in Idle.
pub fn started_machine(settings: Settings, displays: usize) -> (BreakStateMachine, Fakes) {
    let fakes = Fakes::new(Some(returning_user(settings)));
    let mut machine = BreakStateMachine::new(fakes.collaborators(displays));
    machine.start(chrono::Local::now());
    (machine, fakes)
}

/// Application state around a machine that schedules through a real task
/// manager. The machine is not started. Must run inside a tokio runtime.
pub fn app_state(
    snapshot: Option<ConfigSnapshot>,
    displays: usize,
) -> (Arc<AppState>, Fakes, UnboundedReceiver<CompletionEvent>) {
    let (tasks, completions) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();
    let fakes = Fakes::new(snapshot);
    let scheduler: Arc<dyn TaskScheduler> = Arc::new(tasks.clone());
    let machine = BreakStateMachine::new(fakes.collaborators_with(scheduler, displays));

    let state = Arc::new(AppState::new(
        machine,
        Arc::new(TargetRegistry::new()),
        tasks,
        ActivitySignal::default(),
        "127.0.0.1".to_string(),
        20554,
    ));
    (state, fakes, completions)
}
