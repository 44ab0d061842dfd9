//! Lifecycle sweeper: periodically asks the coordinator to sweep.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::coordinator::mailbox::CoordinatorHandle;

/// Spawns the sweep timer. The first sweep happens one `period` after start.
pub fn spawn_sweeper(
    coordinator: CoordinatorHandle,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(period_secs = period.as_secs(), "Sweeper started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if coordinator.request_sweep().is_err() {
                        warn!("Coordinator gone, stopping sweeper");
                        break;
                    }
                }
            }
        }
        debug!("Sweeper stopped");
    })
}
