//! Shared-secret admin gate and the set of privileged connections.

use std::collections::HashSet;

use subtle::ConstantTimeEq;

use poker_core::types::ConnectionId;

/// Decides which connections may use admin operations.
///
/// Without a configured secret every authentication attempt fails.
#[derive(Default)]
pub struct AdminGate {
    secret: Option<String>,
    privileged: HashSet<ConnectionId>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.secret.is_some())
            .field("privileged", &self.privileged.len())
            .finish()
    }
}

impl AdminGate {
    /// Creates a gate for `secret`. Empty secrets count as unset.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(str::to_string),
            privileged: HashSet::new(),
        }
    }

    /// Checks `password` and grants or revokes privilege accordingly.
    pub fn authenticate(&mut self, conn_id: ConnectionId, password: Option<&str>) -> bool {
        let granted = match (&self.secret, password) {
            (Some(secret), Some(candidate)) => {
                bool::from(secret.as_bytes().ct_eq(candidate.as_bytes()))
            }
            _ => false,
        };
        if granted {
            self.privileged.insert(conn_id);
        } else {
            self.privileged.remove(&conn_id);
        }
        granted
    }

    /// Whether the connection has authenticated.
    pub fn is_privileged(&self, conn_id: &ConnectionId) -> bool {
        self.privileged.contains(conn_id)
    }

    /// Drops a connection's privilege.
    pub fn revoke(&mut self, conn_id: &ConnectionId) -> bool {
        self.privileged.remove(conn_id)
    }

    /// Privileged connections.
    pub fn privileged(&self) -> Vec<ConnectionId> {
        self.privileged.iter().copied().collect()
    }
}
