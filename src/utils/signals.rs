//! Signal handling for graceful shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for a shutdown signal (SIGTERM or SIGINT).
///
/// Shutting the process down does not clear the recovery snapshot: a
/// countdown paused before the signal is still resumable on the next boot.
pub async fn shutdown_signal() {
    let mut signals = Signals::new([signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT])
        .expect("failed to register signal handler");

    if let Some(signal) = signals.next().await {
        info!("received signal {}, shutting down", signal);
    }
}
