//! Frame delivery: direct replies, room fan-out, and lobby broadcasts.

use tracing::{debug, error, trace};

use poker_core::AppResult;
use poker_core::types::{ConnectionId, RoomId};

use crate::message::OutboundMessage;
use crate::message::serializer::serialize_outbound;

use super::SessionCoordinator;

impl SessionCoordinator {
    pub(super) fn encode(msg: &OutboundMessage) -> Option<String> {
        match serialize_outbound(msg) {
            Ok(frame) => Some(frame),
            Err(e) => {
                error!(error = %e, "Failed to serialize outbound message");
                None
            }
        }
    }

    pub(super) fn send_frame(&self, conn_id: &ConnectionId, frame: &str) {
        let delivered = self
            .pool
            .get(conn_id)
            .is_some_and(|handle| handle.send(frame.to_string()));
        self.metrics.record_send(delivered);
    }

    /// Sends one message to one connection.
    pub(super) fn send(&self, conn_id: &ConnectionId, msg: &OutboundMessage) {
        if let Some(frame) = Self::encode(msg) {
            self.send_frame(conn_id, &frame);
        }
    }

    /// Sends one message to many connections, serializing it once.
    pub(super) fn fanout(&self, targets: &[ConnectionId], msg: &OutboundMessage) {
        if targets.is_empty() {
            return;
        }
        if let Some(frame) = Self::encode(msg) {
            for conn_id in targets {
                self.send_frame(conn_id, &frame);
            }
        }
    }

    /// Sends the full room state to everyone in the room's group.
    pub(super) fn broadcast_room(&self, room_id: &RoomId) {
        if let Some(room) = self.rooms.get(room_id) {
            let members = self.groups.subscribers(room_id);
            self.fanout(&members, &OutboundMessage::RoomStateUpdated(room.clone()));
        }
    }

    /// Sends the lobby listing to every connection and the full snapshot
    /// to every administrator.
    pub(super) fn broadcast_room_list(&self) {
        let everyone: Vec<ConnectionId> = self
            .pool
            .all_connections()
            .iter()
            .map(|handle| handle.id)
            .collect();
        self.fanout(
            &everyone,
            &OutboundMessage::RoomListUpdated(self.rooms.summaries()),
        );

        let admins = self.admins.privileged();
        self.fanout(
            &admins,
            &OutboundMessage::AdminDataUpdated(self.rooms.snapshot()),
        );
    }

    /// Sends the lobby listing to one connection.
    pub(super) fn send_room_list(&self, conn_id: ConnectionId) {
        self.send(
            &conn_id,
            &OutboundMessage::RoomListUpdated(self.rooms.summaries()),
        );
    }

    /// Answers a request.
    ///
    /// With an ack id the outcome is reported only through the ack;
    /// without one, failures become a `roomError`. Authorization failures
    /// are never described to the caller.
    pub(super) fn respond(
        &self,
        conn_id: ConnectionId,
        event: &str,
        ack: Option<u64>,
        result: AppResult<()>,
    ) {
        let err = match result {
            Ok(()) => {
                if let Some(id) = ack {
                    self.send(
                        &conn_id,
                        &OutboundMessage::Ack {
                            id,
                            success: true,
                            message: None,
                        },
                    );
                }
                return;
            }
            Err(err) => err,
        };

        self.metrics.inc_rejected();
        if err.is_silent() {
            trace!(conn_id = %conn_id, event, reason = %err.message, "Ignoring unauthorized request");
        } else {
            debug!(conn_id = %conn_id, event, kind = %err.kind, reason = %err.message, "Request rejected");
        }

        match ack {
            Some(id) => {
                let message = (!err.is_silent()).then(|| err.message.clone());
                self.send(
                    &conn_id,
                    &OutboundMessage::Ack {
                        id,
                        success: false,
                        message,
                    },
                );
            }
            None if !err.is_silent() => {
                self.send(&conn_id, &OutboundMessage::room_error(err.message));
            }
            None => {}
        }
    }
}
