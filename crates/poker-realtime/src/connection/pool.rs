//! Connection pool: tracks all live connections.

use std::sync::Arc;

use dashmap::DashMap;

use poker_core::types::ConnectionId;

use super::handle::ConnectionHandle;

/// Thread-safe pool of all live WebSocket connections.
///
/// Shared between the transport (which adds handles as sockets open) and
/// the coordinator (which sends to and removes them).
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(conn_id).map(|(_, handle)| handle)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Whether the connection is still in the pool and alive.
    pub fn is_live(&self, conn_id: &ConnectionId) -> bool {
        self.by_id
            .get(conn_id)
            .is_some_and(|entry| entry.value().is_alive())
    }

    /// Returns total number of live connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Closes and removes every connection.
    pub fn close_all(&self) -> usize {
        let all = self.all_connections();
        for conn in &all {
            conn.close();
            self.by_id.remove(&conn.id);
        }
        all.len()
    }
}
