//! Room store: the authoritative room map.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use poker_core::types::{ConnectionId, RoomId};

use super::model::{Room, RoomSummary};
use super::naming::dedupe_name;

/// All live rooms, in creation order.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: IndexMap<RoomId, Room>,
}

impl RoomStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a room.
    pub fn insert(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    /// Looks up a room.
    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Looks up a room for mutation.
    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Removes a room, keeping the order of the rest.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<Room> {
        self.rooms.shift_remove(room_id)
    }

    /// Whether the room exists.
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether there are no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// All room ids in creation order.
    pub fn ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }

    /// `base`, de-duplicated against every existing room name.
    pub fn unique_name(&self, base: &str) -> String {
        dedupe_name(base, |candidate| {
            self.rooms.values().any(|room| room.name == candidate)
        })
    }

    /// Lobby listing.
    pub fn summaries(&self) -> Vec<RoomSummary> {
        self.rooms.values().map(Room::summary).collect()
    }

    /// Full copy of every room.
    pub fn snapshot(&self) -> IndexMap<RoomId, Room> {
        self.rooms.clone()
    }

    /// Rooms whose lifetime ran out.
    pub fn expired_ids(&self, now: DateTime<Utc>) -> Vec<RoomId> {
        self.rooms
            .values()
            .filter(|room| room.is_expired(now))
            .map(|room| room.id)
            .collect()
    }

    /// Rooms without members.
    pub fn empty_ids(&self) -> Vec<RoomId> {
        self.rooms
            .values()
            .filter(|room| room.is_empty())
            .map(|room| room.id)
            .collect()
    }

    /// Rooms the connection is a member of.
    pub fn rooms_of(&self, conn_id: &ConnectionId) -> Vec<RoomId> {
        self.rooms
            .values()
            .filter(|room| room.has_member(conn_id))
            .map(|room| room.id)
            .collect()
    }
}
