//! User activity probes

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Reports whether the user moved since the previous poll.
pub trait ActivityProbe: Send {
    /// `true` when the user was active since the last call.
    fn poll_movement(&mut self) -> bool;

    fn install(&mut self) {}

    fn uninstall(&mut self) {}

    /// Drop any state gathered so far and start listening again.
    fn reinstall(&mut self) {
        self.uninstall();
        self.install();
    }
}

/// Shared flag raised by whoever observes user input.
#[derive(Debug, Clone, Default)]
pub struct ActivitySignal(Arc<AtomicBool>);

impl ActivitySignal {
    pub fn notify(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Probe fed from outside the process, e.g. through the control API.
#[derive(Debug, Clone)]
pub struct SignalActivityProbe {
    signal: ActivitySignal,
}

impl SignalActivityProbe {
    pub fn new(signal: ActivitySignal) -> Self {
        Self { signal }
    }
}

impl ActivityProbe for SignalActivityProbe {
    fn poll_movement(&mut self) -> bool {
        self.signal.take()
    }

    fn uninstall(&mut self) {
        self.signal.clear();
    }
}

#[cfg(feature = "input-hook")]
pub use hook::HookActivityProbe;

#[cfg(feature = "input-hook")]
mod hook {
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;

    use rdev::{listen, Event, EventType};
    use tracing::{debug, warn};

    use super::ActivityProbe;

    #[derive(Debug, Default)]
    struct Observed {
        cursor: Option<(f64, f64)>,
        input: bool,
    }

    /// Global input hook. Cursor moves of more than one pixel between polls,
    /// key presses, clicks and wheel events all count as activity.
    pub struct HookActivityProbe {
        observed: Arc<Mutex<Observed>>,
        polled_cursor: Option<(f64, f64)>,
        listening: bool,
    }

    impl HookActivityProbe {
        pub fn new() -> Self {
            Self {
                observed: Arc::new(Mutex::new(Observed::default())),
                polled_cursor: None,
                listening: false,
            }
        }
    }

    impl Default for HookActivityProbe {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ActivityProbe for HookActivityProbe {
        fn poll_movement(&mut self) -> bool {
            let mut observed = self.observed.lock().unwrap_or_else(PoisonError::into_inner);
            let input = std::mem::take(&mut observed.input);

            let moved = match (self.polled_cursor, observed.cursor) {
                (Some((px, py)), Some((x, y))) => (x - px).abs() > 1.0 || (y - py).abs() > 1.0,
                (None, Some(_)) => true,
                _ => false,
            };
            if moved {
                self.polled_cursor = observed.cursor;
            }

            input || moved
        }

        fn install(&mut self) {
            // rdev::listen never returns, so the listener thread lives for the
            // whole process and reinstalling only resets what it gathered
            if self.listening {
                return;
            }
            self.listening = true;

            let observed = Arc::clone(&self.observed);
            std::thread::spawn(move || loop {
                let sink = Arc::clone(&observed);
                let result = listen(move |event: Event| {
                    let mut observed = sink.lock().unwrap_or_else(PoisonError::into_inner);
                    match event.event_type {
                        EventType::MouseMove { x, y } => observed.cursor = Some((x, y)),
                        EventType::KeyPress(_) | EventType::ButtonPress(_) | EventType::Wheel { .. } => {
                            observed.input = true
                        }
                        _ => {}
                    }
                });
                match result {
                    Ok(()) => break,
                    Err(e) => {
                        warn!("Input hook failed: {:?}, retrying in 1 second", e);
                        std::thread::sleep(Duration::from_secs(1));
                    }
                }
            });
            debug!("Input hook installed");
        }

        fn uninstall(&mut self) {
            let mut observed = self.observed.lock().unwrap_or_else(PoisonError::into_inner);
            observed.input = false;
            self.polled_cursor = observed.cursor;
        }
    }
}
