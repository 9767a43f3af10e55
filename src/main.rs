//! eyerest - break reminder daemon
//!
//! This is the main entry point: it wires the break machine to the task
//! scheduler, the headless surfaces and the HTTP control API.

use std::sync::Arc;
use chrono::Local;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::{error, info};

use eyerest::{
    api::create_router,
    config::Config,
    services::{ActivityProbe, ActivitySignal, DisplayEnumerator, FixedDisplays, HeadlessWindows, NoFullscreen},
    settings::JsonSettingsStore,
    state::{AppState, BreakStateMachine, Collaborators},
    tasks::{dispatch_task, TargetRegistry, TaskManager, TaskScheduler},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("eyerest={},tower_http=info", config.log_level()))
        .init();

    info!("Starting eyerest v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, displays={}, tick={}ms",
          config.host, config.port, config.displays, config.tick_ms);

    // Without the timer loop nothing would ever happen
    let (tasks, completions) = TaskManager::start(config.tick_resolution())?;

    let settings_path = config.settings_path()?;
    info!("Settings file: {}", settings_path.display());

    let registry = Arc::new(TargetRegistry::new());
    let (surface_tx, surface_rx) = mpsc::unbounded_channel();
    let activity = ActivitySignal::default();
    let scheduler: Arc<dyn TaskScheduler> = Arc::new(tasks.clone());

    let displays = FixedDisplays::new(config.displays);
    for index in 0..displays.count() {
        if let Some(rect) = displays.geometry(index) {
            info!("Display {}: {}x{} at ({}, {})", index, rect.width, rect.height, rect.x, rect.y);
        }
    }

    let collaborators = Collaborators {
        scheduler: Arc::clone(&scheduler),
        activity: activity_probe(&activity),
        fullscreen: Box::new(NoFullscreen),
        displays: Box::new(displays),
        windows: Box::new(HeadlessWindows::new(scheduler, Arc::clone(&registry), surface_tx)),
        store: Box::new(JsonSettingsStore::new(settings_path)),
    };

    let mut machine = BreakStateMachine::new(collaborators);
    machine.set_time_multiplier(config.multiplier);

    let state = Arc::new(AppState::new(
        machine,
        registry,
        tasks,
        activity,
        config.host.clone(),
        config.port,
    ));

    state
        .with_machine(|machine| machine.start(Local::now()))
        .map_err(anyhow::Error::msg)?;

    // Start the dispatcher background task
    let dispatch_state = Arc::clone(&state);
    tokio::spawn(async move {
        dispatch_task(dispatch_state, completions, surface_rx).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control API running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /pause?minutes=N - Pause or resume break monitoring");
    info!("  POST /break-now       - Take a long break now");
    info!("  POST /break/accept    - Start the offered long break");
    info!("  POST /break/postpone  - Postpone the offered long break");
    info!("  POST /break/refuse    - Refuse the offered long break");
    info!("  POST /break/skip      - Skip the running long break");
    info!("  POST /activity        - Report user activity");
    info!("  GET  /settings        - Current settings");
    info!("  PUT  /settings        - Apply edited settings");
    info!("  GET  /status          - Countdowns and statistics");
    info!("  GET  /health          - Health check");
    info!("  POST /quit            - Exit");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Signal handler failed: {}", e),
            }
        }
        _ = state.shutdown.notified() => {
            info!("Exit requested through the break machine");
        }
    }

    state.shutdown_core(Local::now());

    info!("Shutdown complete");
    Ok(())
}

#[cfg(feature = "input-hook")]
fn activity_probe(_signal: &ActivitySignal) -> Box<dyn ActivityProbe> {
    Box::new(eyerest::services::HookActivityProbe::new())
}

#[cfg(not(feature = "input-hook"))]
fn activity_probe(signal: &ActivitySignal) -> Box<dyn ActivityProbe> {
    Box::new(eyerest::services::SignalActivityProbe::new(signal.clone()))
}
