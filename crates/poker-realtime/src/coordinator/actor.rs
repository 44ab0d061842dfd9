//! The single task that owns and drives the coordinator.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::SessionCoordinator;
use super::mailbox::Command;

/// Runs the coordinator until the mailbox closes or `shutdown` fires.
///
/// Commands and TTL expiries are handled strictly one at a time.
pub async fn run(
    mut coordinator: SessionCoordinator,
    mut rx: mpsc::Receiver<Command>,
    shutdown: CancellationToken,
) -> SessionCoordinator {
    info!("Session coordinator started");
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                debug!("Coordinator shutdown requested");
                break;
            }
            command = rx.recv() => match command {
                Some(command) => apply(&mut coordinator, command),
                None => break,
            },
            Some(room_id) = coordinator.next_expiry(), if coordinator.has_pending_expiries() => {
                coordinator.expire_room(room_id);
            }
        }
    }
    info!("Session coordinator stopped");
    coordinator
}

fn apply(coordinator: &mut SessionCoordinator, command: Command) {
    match command {
        Command::Inbound { conn_id, request } => coordinator.handle(conn_id, request),
        Command::Rejected { conn_id, rejected } => coordinator.reject(conn_id, rejected),
        Command::Disconnected { conn_id } => coordinator.disconnect(conn_id),
        Command::Sweep => {
            coordinator.sweep();
        }
        Command::Stats { reply } => {
            let _ = reply.send(coordinator.stats());
        }
    }
}
