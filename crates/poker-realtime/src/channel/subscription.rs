//! Subscription tracking: which rooms each connection listens to.

use std::collections::{HashMap, HashSet};

use poker_core::types::{ConnectionId, RoomId};

/// Connection → room groups reverse index.
#[derive(Debug, Default)]
pub struct SubscriptionTracker {
    conn_to_rooms: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl SubscriptionTracker {
    /// Creates a new subscription tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a subscription.
    pub fn add(&mut self, conn_id: ConnectionId, room_id: RoomId) {
        self.conn_to_rooms.entry(conn_id).or_default().insert(room_id);
    }

    /// Removes a subscription.
    pub fn remove(&mut self, conn_id: ConnectionId, room_id: &RoomId) {
        if let Some(rooms) = self.conn_to_rooms.get_mut(&conn_id) {
            rooms.remove(room_id);
            if rooms.is_empty() {
                self.conn_to_rooms.remove(&conn_id);
            }
        }
    }

    /// Rooms a connection is subscribed to.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> HashSet<RoomId> {
        self.conn_to_rooms
            .get(&conn_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Removes all subscriptions for a connection.
    pub fn remove_all(&mut self, conn_id: ConnectionId) -> HashSet<RoomId> {
        self.conn_to_rooms.remove(&conn_id).unwrap_or_default()
    }
}
