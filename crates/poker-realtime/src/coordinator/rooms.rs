//! Registration, room creation, membership, and room destruction.

use tracing::{debug, info};

use poker_core::AppResult;
use poker_core::error::AppError;
use poker_core::types::{ConnectionId, RoomId};

use crate::message::OutboundMessage;
use crate::room::naming::{DEFAULT_ROOM_NAME, sanitize_name};
use crate::room::{Room, RoomUser};

use super::{REASON_EMPTY, SessionCoordinator};

impl SessionCoordinator {
    /// Stores (or overwrites) the connection's display name.
    pub(super) fn register(&mut self, conn_id: ConnectionId, raw_name: Option<&str>) {
        let name = self.names.register(conn_id, raw_name);
        info!(conn_id = %conn_id, name = %name, "Connection registered");
    }

    /// Answers whether a room exists, with its state when it does.
    pub(super) fn check_room(&self, conn_id: ConnectionId, raw_id: Option<&str>) {
        let room = raw_id
            .and_then(|raw| raw.parse::<RoomId>().ok())
            .and_then(|id| self.rooms.get(&id))
            .cloned();
        self.send(
            &conn_id,
            &OutboundMessage::RoomCheckResult {
                exists: room.is_some(),
                room_data: room,
            },
        );
    }

    /// Creates a room owned by the caller and joins the caller into it.
    ///
    /// When the join fails the room is removed again and the join error
    /// is returned.
    pub(super) fn create_room(
        &mut self,
        conn_id: ConnectionId,
        room_name: Option<&str>,
        max_users: Option<u64>,
        user_name: Option<&str>,
    ) -> AppResult<RoomId> {
        if user_name.is_some() {
            self.register(conn_id, user_name);
        }

        let max_rooms = self.settings.max_rooms;
        if self.rooms.len() >= max_rooms {
            return Err(AppError::capacity(format!(
                "Room limit reached ({max_rooms}). Please try again later or join an existing room."
            )));
        }

        let base = sanitize_name(room_name, self.settings.name_max_chars, DEFAULT_ROOM_NAME);
        let name = self.rooms.unique_name(&base);
        let capacity = self.capacity_for(max_users);
        let room_id = RoomId::new();
        let room = Room::new(
            room_id,
            name.clone(),
            conn_id,
            capacity,
            self.clock.now(),
            self.settings.room_ttl(),
        );
        self.rooms.insert(room);

        if let Err(e) = self.join_room(conn_id, room_id, None) {
            self.rooms.remove(&room_id);
            debug!(conn_id = %conn_id, room_id = %room_id, "Creator could not join, room rolled back");
            return Err(e);
        }

        let key = self.expiries.insert(room_id, self.settings.room_ttl());
        self.expiry_keys.insert(room_id, key);
        self.metrics.room_created();
        info!(
            conn_id = %conn_id,
            room_id = %room_id,
            name = %name,
            max_users = capacity,
            rooms = self.rooms.len(),
            "Room created"
        );
        Ok(room_id)
    }

    fn capacity_for(&self, requested: Option<u64>) -> usize {
        match requested {
            None | Some(0) => self.settings.default_max_users,
            Some(n) => usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.settings.max_users_limit.max(1)),
        }
    }

    /// Adds the caller to a room, leaving any other room first.
    pub(super) fn join_room(
        &mut self,
        conn_id: ConnectionId,
        room_id: RoomId,
        user_name: Option<&str>,
    ) -> AppResult<()> {
        if user_name.is_some() {
            self.register(conn_id, user_name);
        }

        let room = self
            .rooms
            .get(&room_id)
            .ok_or_else(|| AppError::not_found("Room not found."))?;

        if room.has_member(&conn_id) {
            self.groups.subscribe(room_id, conn_id);
            self.send(&conn_id, &OutboundMessage::RoomStateUpdated(room.clone()));
            return Ok(());
        }

        let full = room.is_full();
        let name = self.names.name(&conn_id).map(str::to_string);
        let address = self.pool.get(&conn_id).and_then(|handle| handle.address);
        let now = self.clock.now();

        if self
            .bans
            .is_banned(&room_id, name.as_deref(), address, now)
        {
            return Err(AppError::banned("Access denied."));
        }
        if full {
            return Err(AppError::capacity("Room is full."));
        }
        let Some(name) = name else {
            return Err(AppError::unregistered(
                "Please register a name before joining a room.",
            ));
        };

        for other in self.rooms.rooms_of(&conn_id) {
            if other != room_id {
                self.remove_member(other, conn_id);
            }
        }

        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Err(AppError::not_found("Room not found."));
        };
        room.add_member(RoomUser::new(conn_id, name.clone(), address));
        self.groups.subscribe(room_id, conn_id);
        info!(conn_id = %conn_id, room_id = %room_id, name = %name, "Joined room");

        self.broadcast_room_list();
        self.broadcast_room(&room_id);
        Ok(())
    }

    /// Removes the caller from a room, then republishes the lobby listing
    /// whether or not the caller was a member.
    pub(super) fn leave_room(&mut self, conn_id: ConnectionId, room_id: RoomId) {
        self.groups.unsubscribe(&room_id, conn_id);
        if self.remove_member(room_id, conn_id).is_none() {
            debug!(conn_id = %conn_id, room_id = %room_id, "Leave for a room the caller is not in");
        }
        self.broadcast_room_list();
    }

    /// Takes a member out of a room's group and membership. Destroys the
    /// room when it empties, otherwise broadcasts the new state (with a new
    /// owner if the owner left). Does not touch the lobby listing.
    pub(super) fn remove_member(
        &mut self,
        room_id: RoomId,
        conn_id: ConnectionId,
    ) -> Option<RoomUser> {
        self.groups.unsubscribe(&room_id, conn_id);
        let room = self.rooms.get_mut(&room_id)?;
        let (removed, new_owner) = room.remove_member(&conn_id);
        let removed = removed?;
        let now_empty = room.is_empty();
        info!(conn_id = %conn_id, room_id = %room_id, name = %removed.name, "Left room");

        if now_empty {
            self.destroy_room(room_id, REASON_EMPTY);
        } else {
            if let Some(owner) = new_owner {
                info!(room_id = %room_id, new_owner = %owner, "Ownership transferred");
            }
            self.broadcast_room(&room_id);
        }
        Some(removed)
    }

    /// Destroys a room. Returns false when it was already gone.
    ///
    /// Members receive `roomExpired` with `reason` and are detached from the
    /// room's group; the room's bans and TTL timer are dropped. The lobby
    /// listing is left to the caller.
    pub(crate) fn destroy_room(&mut self, room_id: RoomId, reason: &str) -> bool {
        let Some(room) = self.rooms.remove(&room_id) else {
            return false;
        };
        if let Some(key) = self.expiry_keys.remove(&room_id) {
            self.expiries.try_remove(&key);
        }

        let members = self.groups.detach_group(&room_id);
        self.fanout(&members, &OutboundMessage::room_expired(reason));
        let bans = self.bans.clear(&room_id);
        self.metrics.room_destroyed();

        info!(
            room_id = %room_id,
            name = %room.name,
            reason,
            notified = members.len(),
            bans_cleared = bans,
            "Room destroyed"
        );
        true
    }
}
