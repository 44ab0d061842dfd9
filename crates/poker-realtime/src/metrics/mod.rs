//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections established
    pub connections_total: AtomicU64,
    /// Connections currently open
    pub connections_active: AtomicU64,
    /// Frames received from clients
    pub messages_received: AtomicU64,
    /// Frames queued to clients
    pub messages_sent: AtomicU64,
    /// Frames dropped because a client was gone or too slow
    pub messages_dropped: AtomicU64,
    /// Rooms created
    pub rooms_created: AtomicU64,
    /// Rooms destroyed for any reason
    pub rooms_destroyed: AtomicU64,
    /// Members removed by owners or administrators
    pub kicks: AtomicU64,
    /// Requests answered with an error or silently ignored
    pub requests_rejected: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection opened.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A connection closed.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// A frame arrived.
    pub fn inc_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// A frame was queued (`true`) or dropped (`false`).
    pub fn record_send(&self, delivered: bool) {
        if delivered {
            self.messages_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.messages_dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// A room was created.
    pub fn room_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    /// A room was destroyed.
    pub fn room_destroyed(&self) {
        self.rooms_destroyed.fetch_add(1, Ordering::Relaxed);
    }

    /// A member was kicked.
    pub fn inc_kicks(&self) {
        self.kicks.fetch_add(1, Ordering::Relaxed);
    }

    /// A request was rejected.
    pub fn inc_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_destroyed: self.rooms_destroyed.load(Ordering::Relaxed),
            kicks: self.kicks.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever established
    pub connections_total: u64,
    /// Currently active connections
    pub connections_active: u64,
    /// Frames received
    pub messages_received: u64,
    /// Frames queued
    pub messages_sent: u64,
    /// Frames dropped
    pub messages_dropped: u64,
    /// Rooms created
    pub rooms_created: u64,
    /// Rooms destroyed
    pub rooms_destroyed: u64,
    /// Kicks and admin removals
    pub kicks: u64,
    /// Rejected requests
    pub requests_rejected: u64,
}
