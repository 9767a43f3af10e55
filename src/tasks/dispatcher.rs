//! Dispatcher task
//!
//! The single loop that feeds completion events and surface callbacks into
//! their targets, one at a time.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use super::CompletionEvent;
use crate::{services::SurfaceEvent, state::AppState};

/// Drain both queues until shutdown begins or both senders are gone.
pub async fn dispatch_task(
    state: Arc<AppState>,
    mut completions: UnboundedReceiver<CompletionEvent>,
    mut surfaces: UnboundedReceiver<SurfaceEvent>,
) {
    info!("Dispatcher started");

    loop {
        tokio::select! {
            Some(event) = completions.recv() => {
                state.dispatch(&event);
            }
            Some(event) = surfaces.recv() => {
                state.handle_surface_event(event);
            }
            else => break,
        }

        if state.is_finished() {
            break;
        }
    }

    info!("Dispatcher stopped");
}
