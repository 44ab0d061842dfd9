//! Voting rounds: cast, reveal, reset.

use serde_json::Value;
use tracing::debug;

use poker_core::AppResult;
use poker_core::error::AppError;
use poker_core::types::{ConnectionId, RoomId};

use crate::message::validator::validate_vote;
use crate::room::Room;

use super::SessionCoordinator;

impl SessionCoordinator {
    fn owned_room(&mut self, conn_id: &ConnectionId, room_id: &RoomId) -> AppResult<&mut Room> {
        self.rooms
            .get_mut(room_id)
            .filter(|room| room.is_owner(conn_id))
            .ok_or_else(|| AppError::authorization("Only the room owner may do that"))
    }

    /// Records the caller's vote.
    pub(super) fn vote(
        &mut self,
        conn_id: ConnectionId,
        room_id: RoomId,
        value: &Value,
    ) -> AppResult<()> {
        let max_chars = self.settings.max_vote_chars;
        let room = self
            .rooms
            .get_mut(&room_id)
            .filter(|room| room.has_member(&conn_id))
            .ok_or_else(|| AppError::authorization("Not a member of this room"))?;
        let vote = validate_vote(value, max_chars)?;

        debug!(conn_id = %conn_id, room_id = %room_id, vote = %vote, "Vote cast");
        room.cast_vote(&conn_id, vote);
        self.broadcast_room(&room_id);
        Ok(())
    }

    /// Reveals the round's votes.
    pub(super) fn show_votes(&mut self, conn_id: ConnectionId, room_id: RoomId) -> AppResult<()> {
        self.owned_room(&conn_id, &room_id)?.reveal();
        debug!(conn_id = %conn_id, room_id = %room_id, "Votes revealed");
        self.broadcast_room(&room_id);
        Ok(())
    }

    /// Hides and clears every vote.
    pub(super) fn reset_votes(&mut self, conn_id: ConnectionId, room_id: RoomId) -> AppResult<()> {
        self.owned_room(&conn_id, &room_id)?.reset_votes();
        debug!(conn_id = %conn_id, room_id = %room_id, "Votes reset");
        self.broadcast_room(&room_id);
        Ok(())
    }
}
