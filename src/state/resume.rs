//! Resume-after-restart policy

use chrono::{DateTime, Local};

use crate::settings::ShutdownSnapshot;
use crate::units::{minutes, Millis};

/// Shutdowns older than this are not resumed.
pub const RESUME_WINDOW_MINUTES: i64 = 30;
/// Resumed countdowns are never shorter than this.
pub const RESUME_FLOOR: Millis = minutes(1);

/// How the countdowns should be initialised on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePlan {
    /// Apply the configured intervals from scratch
    Fresh,
    /// Continue where the previous run stopped; `mini: None` restarts the mini
    /// interval fresh
    Resume { big: Millis, mini: Option<Millis> },
}

/// Decide how to continue after a restart.
///
/// The returned values are before the 60 s floor; [`ResumePlan::floored`]
/// applies it.
pub fn plan_resume(snapshot: &ShutdownSnapshot, now: DateTime<Local>) -> ResumePlan {
    let Some(last_shutdown) = snapshot.last_shutdown else {
        return ResumePlan::Fresh;
    };

    let gap = now.signed_duration_since(last_shutdown);
    if gap.num_minutes() > RESUME_WINDOW_MINUTES {
        return ResumePlan::Fresh;
    }

    let gap_ms = gap.num_milliseconds();
    let big = snapshot.last_big_pause_time_left - gap_ms;
    let mini = snapshot.last_mini_pause_time_left - gap_ms;

    if big <= 0 {
        // the break was already due while we were away
        return ResumePlan::Fresh;
    }

    ResumePlan::Resume {
        big,
        mini: (mini > 0).then_some(mini),
    }
}

impl ResumePlan {
    /// Raise resumed countdowns to [`RESUME_FLOOR`].
    pub fn floored(self) -> Self {
        match self {
            ResumePlan::Fresh => ResumePlan::Fresh,
            ResumePlan::Resume { big, mini } => ResumePlan::Resume {
                big: big.max(RESUME_FLOOR),
                mini: mini.map(|ms| ms.max(RESUME_FLOOR)),
            },
        }
    }
}
