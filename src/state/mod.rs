//! State management module
//!
//! This module contains the break machine, its countdowns, the resume policy
//! and the application context that owns them.

pub mod app_state;
pub mod break_machine;
pub mod countdowns;
pub mod resume;
pub mod status;

// Re-export main types
pub use app_state::{AppState, DispatchOutcome};
pub use break_machine::{BreakState, BreakStateMachine, Collaborators, MACHINE_TASK};
pub use countdowns::{ActiveSurfaces, Countdowns};
pub use resume::{plan_resume, ResumePlan};
pub use status::StatusSnapshot;
