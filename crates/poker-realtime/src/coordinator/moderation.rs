//! Kicking members and the shared eviction path.

use tracing::info;

use poker_core::AppResult;
use poker_core::error::AppError;
use poker_core::types::{ConnectionId, RoomId};

use crate::message::OutboundMessage;

use super::{KICK_NOTICE, SessionCoordinator};

impl SessionCoordinator {
    /// Owner removes and bans another member.
    pub(super) fn kick_user(
        &mut self,
        conn_id: ConnectionId,
        room_id: RoomId,
        target: ConnectionId,
    ) -> AppResult<()> {
        let room = self
            .rooms
            .get(&room_id)
            .filter(|room| room.is_owner(&conn_id))
            .ok_or_else(|| AppError::authorization("Only the room owner may kick"))?;
        if target == conn_id {
            return Err(AppError::authorization("Owners cannot kick themselves"));
        }
        if !room.has_member(&target) {
            return Err(AppError::not_found("User not found."));
        }

        self.evict(room_id, target, KICK_NOTICE);
        info!(conn_id = %conn_id, room_id = %room_id, target = %target, "Member kicked by owner");
        Ok(())
    }

    /// Bans a member's name and address, then removes the member.
    ///
    /// A live target receives `notice` as a `roomError`, then `kicked`, and
    /// its connection is closed after both are queued. A target whose
    /// connection is already gone is simply dropped from the room.
    pub(super) fn evict(&mut self, room_id: RoomId, target: ConnectionId, notice: &str) {
        let Some(user) = self
            .rooms
            .get(&room_id)
            .and_then(|room| room.users.get(&target))
            .cloned()
        else {
            return;
        };

        let handle = self.pool.get(&target);
        let address = user
            .address
            .or_else(|| handle.as_ref().and_then(|h| h.address));
        let now = self.clock.now();
        self.bans.ban(
            room_id,
            Some(&user.name),
            address,
            now,
            self.settings.ban_duration(),
        );
        self.metrics.inc_kicks();

        match handle.filter(|h| h.is_alive()) {
            Some(handle) => {
                self.send(&target, &OutboundMessage::room_error(notice));
                self.send(&target, &OutboundMessage::Kicked {});
                self.remove_member(room_id, target);
                handle.close();
            }
            None => {
                info!(room_id = %room_id, target = %target, "Removing stale membership");
                self.remove_member(room_id, target);
            }
        }
        self.broadcast_room_list();
    }
}
