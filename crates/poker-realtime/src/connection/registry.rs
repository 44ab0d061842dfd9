//! Connection registry: display names chosen by each connection.

use std::collections::HashMap;

use poker_core::types::ConnectionId;

use crate::room::naming::sanitize_name;

/// Name used when a registration carries no usable name.
pub const GUEST_NAME: &str = "Guest";

/// Maps live connections to their registered display names.
#[derive(Debug)]
pub struct ConnectionRegistry {
    names: HashMap<ConnectionId, String>,
    max_chars: usize,
}

impl ConnectionRegistry {
    /// Creates an empty registry keeping at most `max_chars` characters per name.
    pub fn new(max_chars: usize) -> Self {
        Self {
            names: HashMap::new(),
            max_chars,
        }
    }

    /// Registers (or re-registers) a connection. Returns the stored name.
    pub fn register(&mut self, conn_id: ConnectionId, raw_name: Option<&str>) -> String {
        let name = sanitize_name(raw_name, self.max_chars, GUEST_NAME);
        self.names.insert(conn_id, name.clone());
        name
    }

    /// Looks up a connection's display name.
    pub fn name(&self, conn_id: &ConnectionId) -> Option<&str> {
        self.names.get(conn_id).map(String::as_str)
    }

    /// Removes a connection's mapping.
    pub fn forget(&mut self, conn_id: &ConnectionId) -> Option<String> {
        self.names.remove(conn_id)
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no connection is registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
