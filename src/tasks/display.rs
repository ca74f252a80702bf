//! Tick display background task

use tracing::{debug, info};

use crate::engine::Attachment;

/// The in-process attached observer: logs the countdown as it progresses.
///
/// Paints the attach-time state first, then one line per delivered tick. The
/// task ends when its attachment is superseded or detached; the engine keeps
/// counting either way.
pub async fn tick_display_task(mut attachment: Attachment) {
    let initial = attachment.initial_state();
    info!(
        remaining = initial.remaining(),
        phase = ?initial.phase(),
        "observer attached"
    );

    while let Some(tick) = attachment.next_tick().await {
        info!(remaining = tick.remaining, "tick");
    }

    debug!("tick delivery channel closed, observer superseded or detached");
}
