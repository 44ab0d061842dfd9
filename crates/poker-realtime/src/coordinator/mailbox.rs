//! Coordinator mailbox: commands and the sending half.

use tokio::sync::{mpsc, oneshot};

use poker_core::AppResult;
use poker_core::error::AppError;
use poker_core::types::ConnectionId;

use crate::message::{Rejected, Request};

use super::CoordinatorStats;

/// Work items processed one at a time by the coordinator task.
#[derive(Debug)]
pub enum Command {
    /// A decoded client request.
    Inbound {
        /// Sender.
        conn_id: ConnectionId,
        /// The request.
        request: Request,
    },
    /// A frame that could not be decoded.
    Rejected {
        /// Sender.
        conn_id: ConnectionId,
        /// What could be read of the frame.
        rejected: Rejected,
    },
    /// The transport closed a connection.
    Disconnected {
        /// Closed connection.
        conn_id: ConnectionId,
    },
    /// Periodic lifecycle sweep.
    Sweep,
    /// Report current counts.
    Stats {
        /// Where to send them.
        reply: oneshot::Sender<CoordinatorStats>,
    },
}

/// Cloneable handle for submitting commands to the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Command>,
}

impl CoordinatorHandle {
    /// Creates a mailbox of `capacity` commands and returns both halves.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Command>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    async fn submit(&self, command: Command) -> AppResult<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| AppError::service_unavailable("Coordinator is not running"))
    }

    /// Queues a client request.
    pub async fn dispatch(&self, conn_id: ConnectionId, request: Request) -> AppResult<()> {
        self.submit(Command::Inbound { conn_id, request }).await
    }

    /// Queues the answer to an undecodable frame.
    pub async fn reject(&self, conn_id: ConnectionId, rejected: Rejected) -> AppResult<()> {
        self.submit(Command::Rejected { conn_id, rejected }).await
    }

    /// Reports a closed connection.
    pub async fn disconnected(&self, conn_id: ConnectionId) -> AppResult<()> {
        self.submit(Command::Disconnected { conn_id }).await
    }

    /// Requests a sweep unless the mailbox is saturated.
    pub fn request_sweep(&self) -> AppResult<()> {
        match self.tx.try_send(Command::Sweep) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(AppError::service_unavailable(
                "Coordinator is not running",
            )),
        }
    }

    /// Asks the coordinator for its counts.
    pub async fn stats(&self) -> AppResult<CoordinatorStats> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Stats { reply }).await?;
        rx.await
            .map_err(|_| AppError::service_unavailable("Coordinator dropped the request"))
    }

    /// Whether the coordinator task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
