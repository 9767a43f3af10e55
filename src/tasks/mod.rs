//! Background tasks module
//!
//! This module contains the task scheduler, the registry of its targets and
//! the dispatcher loop that runs alongside the HTTP server.

pub mod dispatcher;
pub mod registry;
pub mod task_manager;
pub mod tick_source;

// Re-export main types
pub use dispatcher::dispatch_task;
pub use registry::{SharedTarget, TargetRegistry, TaskTarget};
pub use task_manager::{CompletionEvent, TaskManager, TaskScheduler, DEFAULT_RESOLUTION};
pub use tick_source::TickSource;
