//! Channel registry: manages room broadcast groups and subscriptions.

use std::collections::HashMap;

use poker_core::types::{ConnectionId, RoomId};

use super::group::RoomGroup;
use super::subscription::SubscriptionTracker;

/// Registry of all room broadcast groups.
///
/// Owned by the coordinator, so plain maps suffice.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    groups: HashMap<RoomId, RoomGroup>,
    subscriptions: SubscriptionTracker,
}

impl ChannelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a connection to a room's group.
    pub fn subscribe(&mut self, room_id: RoomId, conn_id: ConnectionId) {
        self.groups
            .entry(room_id)
            .or_insert_with(|| RoomGroup::new(room_id))
            .attach(conn_id);
        self.subscriptions.add(conn_id, room_id);
    }

    /// Unsubscribes a connection from a room's group.
    pub fn unsubscribe(&mut self, room_id: &RoomId, conn_id: ConnectionId) {
        if let Some(group) = self.groups.get_mut(room_id) {
            group.detach(&conn_id);
            if group.is_empty() {
                self.groups.remove(room_id);
            }
        }
        self.subscriptions.remove(conn_id, room_id);
    }

    /// Unsubscribes a connection from every group. Returns the rooms it left.
    pub fn unsubscribe_all(&mut self, conn_id: ConnectionId) -> Vec<RoomId> {
        let rooms = self.subscriptions.remove_all(conn_id);
        for room_id in &rooms {
            if let Some(group) = self.groups.get_mut(room_id) {
                group.detach(&conn_id);
                if group.is_empty() {
                    self.groups.remove(room_id);
                }
            }
        }
        rooms.into_iter().collect()
    }

    /// Drops a whole group, detaching every member. Returns the former members.
    pub fn detach_group(&mut self, room_id: &RoomId) -> Vec<ConnectionId> {
        let Some(group) = self.groups.remove(room_id) else {
            return Vec::new();
        };
        let members = group.members();
        for conn_id in &members {
            self.subscriptions.remove(*conn_id, room_id);
        }
        members
    }

    /// Subscribers of a room's group, in attach order.
    pub fn subscribers(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.groups
            .get(room_id)
            .map(RoomGroup::members)
            .unwrap_or_default()
    }

    /// Rooms a connection is subscribed to.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> Vec<RoomId> {
        self.subscriptions.rooms_of(conn_id).into_iter().collect()
    }

    /// Number of live groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
