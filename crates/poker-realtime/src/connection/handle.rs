//! Individual WebSocket connection handle.

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use poker_core::types::ConnectionId;

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing serialized frames to the client, the
/// remote address used for bans, and the token that forcibly terminates
/// the connection.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Remote network address, when the transport knows it
    pub address: Option<IpAddr>,
    /// Sender for outbound frames
    sender: mpsc::Sender<String>,
    /// Cancelled when the server terminates the connection
    closer: CancellationToken,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle and the receiver of its outbound frames.
    pub fn new(address: Option<IpAddr>, buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Self {
            id: ConnectionId::new(),
            address,
            sender,
            closer: CancellationToken::new(),
            alive: AtomicBool::new(true),
        };
        (handle, receiver)
    }

    /// Queue a frame for this connection. Never blocks.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Terminate the connection. Frames queued before this call are still flushed.
    pub fn close(&self) {
        self.mark_dead();
        self.closer.cancel();
    }

    /// Token the transport watches to learn the server closed the connection.
    pub fn closer(&self) -> CancellationToken {
        self.closer.clone()
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled()
    }
}
