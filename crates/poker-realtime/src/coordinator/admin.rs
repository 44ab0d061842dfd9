//! Privileged operations behind the admin gate.

use tracing::{info, warn};

use poker_core::AppResult;
use poker_core::error::AppError;
use poker_core::types::{ConnectionId, RoomId};

use crate::message::OutboundMessage;

use super::{ADMIN_REMOVAL_NOTICE, REASON_ADMIN_DELETE, REASON_ADMIN_NUKE, SessionCoordinator};

impl SessionCoordinator {
    pub(super) fn require_admin(&self, conn_id: &ConnectionId) -> AppResult<()> {
        if self.admins.is_privileged(conn_id) {
            Ok(())
        } else {
            Err(AppError::authorization("Admin privileges required"))
        }
    }

    /// Checks the shared secret and reports the outcome.
    pub(super) fn admin_auth(&mut self, conn_id: ConnectionId, password: Option<&str>) {
        let success = self.admins.authenticate(conn_id, password);
        if success {
            info!(conn_id = %conn_id, "Admin authenticated");
        } else {
            warn!(conn_id = %conn_id, "Admin authentication failed");
        }
        self.send(&conn_id, &OutboundMessage::AdminAuthResult { success });
    }

    /// Sends the full room store to an administrator.
    pub(super) fn admin_get_data(&self, conn_id: ConnectionId) -> AppResult<()> {
        self.require_admin(&conn_id)?;
        self.send(
            &conn_id,
            &OutboundMessage::AdminDataUpdated(self.rooms.snapshot()),
        );
        Ok(())
    }

    /// Destroys one room.
    pub(super) fn admin_delete_room(
        &mut self,
        conn_id: ConnectionId,
        room_id: RoomId,
    ) -> AppResult<()> {
        self.require_admin(&conn_id)?;
        if !self.destroy_room(room_id, REASON_ADMIN_DELETE) {
            return Err(AppError::not_found("Room not found."));
        }
        info!(conn_id = %conn_id, room_id = %room_id, "Room deleted by admin");
        self.broadcast_room_list();
        Ok(())
    }

    /// Removes and bans one member, like a kick without the owner check.
    pub(super) fn admin_delete_user(
        &mut self,
        conn_id: ConnectionId,
        room_id: RoomId,
        user_id: ConnectionId,
    ) -> AppResult<()> {
        self.require_admin(&conn_id)?;
        let room = self
            .rooms
            .get(&room_id)
            .ok_or_else(|| AppError::not_found("Room not found."))?;
        if !room.has_member(&user_id) {
            return Err(AppError::not_found("User not found."));
        }

        self.evict(room_id, user_id, ADMIN_REMOVAL_NOTICE);
        info!(conn_id = %conn_id, room_id = %room_id, user_id = %user_id, "Member removed by admin");
        Ok(())
    }

    /// Destroys every room and forgets every ban.
    pub(super) fn admin_nuke(&mut self, conn_id: ConnectionId) -> AppResult<()> {
        self.require_admin(&conn_id)?;
        let mut destroyed = 0;
        for room_id in self.rooms.ids() {
            if self.destroy_room(room_id, REASON_ADMIN_NUKE) {
                destroyed += 1;
            }
        }
        let bans = self.bans.clear_all();
        warn!(conn_id = %conn_id, destroyed, bans, "All rooms closed by admin");
        self.broadcast_room_list();
        Ok(())
    }
}
