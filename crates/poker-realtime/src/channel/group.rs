//! A single room broadcast group.

use indexmap::IndexSet;

use poker_core::types::{ConnectionId, RoomId};

/// The set of connections receiving a room's broadcasts.
#[derive(Debug, Clone)]
pub struct RoomGroup {
    /// Room this group fans out for.
    pub room_id: RoomId,
    members: IndexSet<ConnectionId>,
}

impl RoomGroup {
    /// Creates an empty group for a room.
    pub fn new(room_id: RoomId) -> Self {
        Self {
            room_id,
            members: IndexSet::new(),
        }
    }

    /// Adds a member. Returns false if it was already present.
    pub fn attach(&mut self, conn_id: ConnectionId) -> bool {
        self.members.insert(conn_id)
    }

    /// Removes a member. Returns false if it was absent.
    pub fn detach(&mut self, conn_id: &ConnectionId) -> bool {
        self.members.shift_remove(conn_id)
    }

    /// Members in attach order.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }

    /// Number of attached connections.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nobody is attached.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
