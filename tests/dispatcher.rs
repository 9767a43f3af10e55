mod common;

use std::{sync::Arc, time::Duration};

use chrono::Local;
use eyerest::{
    services::{ActivitySignal, HeadlessWindows},
    settings::Settings,
    state::{AppState, BreakState, BreakStateMachine, DispatchOutcome, MACHINE_TASK},
    tasks::{dispatch_task, CompletionEvent, TargetRegistry, TaskManager, TaskScheduler, DEFAULT_RESOLUTION},
};
use tokio::sync::mpsc;

fn completion(target: &str, token: u64) -> CompletionEvent {
    CompletionEvent {
        target: target.to_string(),
        requested: Duration::from_millis(1000),
        elapsed: Duration::from_millis(1000),
        token,
    }
}

#[tokio::test(start_paused = true)]
async fn superseded_completion_is_stale() {
    let (state, _fakes, _completions) = common::app_state(None, 1);

    state.tasks.add_task(MACHINE_TASK, 1000);
    state.tasks.add_task(MACHINE_TASK, 1000);

    assert_eq!(state.dispatch(&completion(MACHINE_TASK, 1)), DispatchOutcome::Stale);
    assert_eq!(state.dispatch(&completion(MACHINE_TASK, 2)), DispatchOutcome::Delivered);
}

#[tokio::test(start_paused = true)]
async fn completion_superseded_while_waiting_for_the_machine_is_stale() {
    let (state, _fakes, _completions) = common::app_state(Some(common::returning_user(Settings::default())), 1);
    state.with_machine(|m| m.start(Local::now())).unwrap();
    let event = completion(MACHINE_TASK, 1);
    assert!(state.tasks.is_current(&event));

    let mut machine = state.machine.lock().unwrap();
    let dispatching = {
        let state = Arc::clone(&state);
        std::thread::spawn(move || state.dispatch(&event))
    };
    std::thread::sleep(Duration::from_millis(100));

    machine.take_long_break_now();
    let relaxing = machine.countdowns().relaxing_time_left;
    drop(machine);

    assert_eq!(dispatching.join().unwrap(), DispatchOutcome::Stale);
    let after = state.with_machine(|m| m.countdowns().relaxing_time_left).unwrap();
    assert_eq!(after, relaxing);
    assert_eq!(state.get_status().next, Some(BreakState::Relaxing));
}

#[tokio::test(start_paused = true)]
async fn completion_without_target_is_dropped() {
    let (state, _fakes, _completions) = common::app_state(None, 1);

    state.tasks.add_task("surface-42", 10);

    assert_eq!(state.dispatch(&completion("surface-42", 1)), DispatchOutcome::UnknownTarget);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_delivered_after_shutdown() {
    let (state, fakes, _completions) = common::app_state(None, 1);
    state.with_machine(|m| m.start(Local::now())).unwrap();
    state.tasks.add_task(MACHINE_TASK, 1000);

    state.shutdown_core(Local::now());
    state.shutdown_core(Local::now());

    assert!(state.is_finished());
    assert!(state.tasks.is_stopped());
    assert_eq!(state.dispatch(&completion(MACHINE_TASK, 2)), DispatchOutcome::Finished);

    let saved = fakes.store.last_saved().unwrap();
    assert!(saved.shutdown.last_shutdown.is_some());
    assert_eq!(fakes.store.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn exit_request_wakes_the_shutdown_waiter() {
    let (state, _fakes, _completions) = common::app_state(None, 1);

    state.with_machine(|m| m.request_exit()).unwrap();

    let woken = tokio::time::timeout(Duration::from_secs(1), state.shutdown.notified()).await;
    assert!(woken.is_ok());
}

#[tokio::test(start_paused = true)]
async fn dispatcher_clocks_the_machine() {
    let settings = Settings {
        mini_pause_enabled: false,
        ..Settings::default()
    };
    let (state, fakes, completions) = common::app_state(Some(common::returning_user(settings)), 1);
    fakes.activity.set_moving(true);
    let (_surface_tx, surface_rx) = mpsc::unbounded_channel();

    state.with_machine(|m| m.start(Local::now())).unwrap();
    let before = state.get_status().big_pause_left_secs;
    tokio::spawn(dispatch_task(Arc::clone(&state), completions, surface_rx));

    tokio::time::sleep(Duration::from_millis(3500)).await;

    let status = state.get_status();
    assert_eq!(status.state, BreakState::Idle);
    assert!(status.big_pause_left_secs < before);
    assert_eq!(status.inactivity_secs, 0);
}

#[tokio::test(start_paused = true)]
async fn headless_confirmation_starts_the_break_by_itself() {
    let (tasks, completions) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();
    let registry = Arc::new(TargetRegistry::new());
    let (surface_tx, surface_rx) = mpsc::unbounded_channel();
    let scheduler: Arc<dyn TaskScheduler> = Arc::new(tasks.clone());

    let settings = Settings {
        mini_pause_enabled: false,
        ..Settings::default()
    };
    let fakes = common::Fakes::new(Some(common::returning_user(settings)));
    fakes.activity.set_moving(true);
    let mut collaborators = fakes.collaborators_with(Arc::clone(&scheduler), 1);
    collaborators.windows = Box::new(HeadlessWindows::new(scheduler, Arc::clone(&registry), surface_tx));

    // Ten minutes of monitoring per real second
    let mut machine = BreakStateMachine::new(collaborators);
    machine.set_time_multiplier(600);

    let state = Arc::new(AppState::new(
        machine,
        registry,
        tasks,
        ActivitySignal::default(),
        "127.0.0.1".to_string(),
        0,
    ));
    state.with_machine(|m| m.start(Local::now())).unwrap();
    tokio::spawn(dispatch_task(Arc::clone(&state), completions, surface_rx));

    // one full cycle: five monitoring steps, ten seconds of prompt, one relaxing step
    tokio::time::sleep(Duration::from_secs(20)).await;

    let long_breaks = state.with_machine(|m| m.statistics().long_break_count).unwrap();
    assert!(long_breaks >= 1);
    // the expired confirmation left no bookkeeping behind
    assert_eq!(state.tasks.tracked_count(), 1);
    state.shutdown_core(Local::now());
}
