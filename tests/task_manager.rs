use std::time::Duration;

use eyerest::tasks::{TaskManager, TaskScheduler, DEFAULT_RESOLUTION};

#[tokio::test(start_paused = true)]
async fn replaced_task_fires_once_with_the_newer_duration() {
    let (manager, mut events) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();

    manager.add_task("machine", 1000);
    manager.add_task("machine", 2000);

    let event = events.recv().await.unwrap();
    assert_eq!(event.target, "machine");
    assert_eq!(event.requested, Duration::from_millis(2000));
    assert!(event.elapsed >= Duration::from_millis(2000));
    assert!(manager.is_current(&event));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(events.try_recv().is_err());
    manager.stop();
}

#[tokio::test(start_paused = true)]
async fn drift_is_passed_through() {
    let (manager, mut events) = TaskManager::start(Duration::from_millis(500)).unwrap();

    manager.add_task("surface-1", 100);

    let event = events.recv().await.unwrap();
    assert!(event.elapsed >= Duration::from_millis(500));
    assert!(event.progress() >= 5.0);
    manager.stop();
}

#[tokio::test(start_paused = true)]
async fn independent_targets_fire_in_order() {
    let (manager, mut events) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();

    manager.schedule("slow", 3000);
    manager.schedule("fast", 1000);

    assert_eq!(events.recv().await.unwrap().target, "fast");
    assert_eq!(events.recv().await.unwrap().target, "slow");
    manager.stop();
}

#[tokio::test(start_paused = true)]
async fn superseded_event_is_no_longer_current() {
    let (manager, mut events) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();

    manager.add_task("machine", 1000);
    let event = events.recv().await.unwrap();
    assert!(manager.is_current(&event));

    manager.add_task("machine", 1000);
    assert!(!manager.is_current(&event));
    manager.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_silences_armed_timers() {
    let (manager, mut events) = TaskManager::start(DEFAULT_RESOLUTION).unwrap();

    manager.add_task("machine", 1000);
    manager.stop();
    manager.add_task("machine", 10);

    assert!(manager.is_stopped());
    assert_eq!(manager.pending_count(), 0);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(events.recv().await.is_none());
}
