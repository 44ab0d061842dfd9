//! Session coordinator: the authoritative room state machine.
//!
//! A [`SessionCoordinator`] owns every store and is driven by exactly one
//! task (see [`actor`]), so each operation runs to completion before the
//! next one starts. Outbound frames go straight to the shared
//! [`ConnectionPool`] and never block.

pub mod actor;
pub mod mailbox;

mod admin;
mod lifecycle;
mod moderation;
mod outbound;
mod rooms;
mod voting;

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::time::{DelayQueue, delay_queue};
use tracing::{debug, info};

use poker_core::config::AppConfig;
use poker_core::config::rooms::RoomsConfig;
use poker_core::error::AppError;
use poker_core::traits::clock::Clock;
use poker_core::types::{ConnectionId, RoomId};

use crate::admin::AdminGate;
use crate::ban::BanStore;
use crate::channel::ChannelRegistry;
use crate::connection::{ConnectionPool, ConnectionRegistry};
use crate::message::{InboundMessage, Rejected, Request, is_privileged_event};
use crate::metrics::EngineMetrics;
use crate::room::RoomStore;

pub use lifecycle::SweepReport;

/// Reason sent when a room outlives its TTL.
pub const REASON_EXPIRED: &str = "Room expired.";
/// Reason sent when the last member leaves.
pub const REASON_EMPTY: &str = "Room closed because everyone left.";
/// Reason sent when an administrator deletes a room.
pub const REASON_ADMIN_DELETE: &str = "Room was closed by an administrator.";
/// Reason sent when an administrator closes every room.
pub const REASON_ADMIN_NUKE: &str = "All rooms were closed by an administrator.";
/// Text sent back for frames that cannot be decoded.
pub const MALFORMED_REQUEST: &str = "Malformed request.";
/// Text shown to a kicked member before the `kicked` event.
pub const KICK_NOTICE: &str = "You have been kicked from the room by the host.";
/// Text shown to a member an administrator removed.
pub const ADMIN_REMOVAL_NOTICE: &str = "You have been removed from the room by an administrator.";

/// Counts reported by the coordinator on request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    /// Live rooms.
    pub rooms: usize,
    /// Members across all rooms.
    pub members: usize,
    /// Connections with a registered name.
    pub registered: usize,
    /// Authenticated administrators.
    pub admins: usize,
    /// Ban entries not yet pruned.
    pub bans: usize,
}

/// The room session coordinator.
pub struct SessionCoordinator {
    settings: RoomsConfig,
    clock: Arc<dyn Clock>,
    pool: Arc<ConnectionPool>,
    metrics: Arc<EngineMetrics>,
    names: ConnectionRegistry,
    rooms: RoomStore,
    bans: BanStore,
    groups: ChannelRegistry,
    admins: AdminGate,
    expiries: DelayQueue<RoomId>,
    expiry_keys: HashMap<RoomId, delay_queue::Key>,
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("rooms", &self.rooms.len())
            .field("registered", &self.names.len())
            .field("admins", &self.admins)
            .finish()
    }
}

impl SessionCoordinator {
    /// Creates a coordinator with empty stores.
    pub fn new(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        pool: Arc<ConnectionPool>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            settings: config.rooms.clone(),
            clock,
            pool,
            metrics,
            names: ConnectionRegistry::new(config.rooms.name_max_chars),
            rooms: RoomStore::new(),
            bans: BanStore::new(),
            groups: ChannelRegistry::new(),
            admins: AdminGate::new(config.admin.secret()),
            expiries: DelayQueue::new(),
            expiry_keys: HashMap::new(),
        }
    }

    /// Applies one client request and answers it.
    pub fn handle(&mut self, conn_id: ConnectionId, request: Request) {
        let Request { message, ack } = request;
        let event = message.event_name();
        debug!(conn_id = %conn_id, event, "Handling request");

        let result = match message {
            InboundMessage::Register { name } => {
                self.register(conn_id, name.as_deref());
                Ok(())
            }
            InboundMessage::GetRoomList {} => {
                self.send_room_list(conn_id);
                Ok(())
            }
            InboundMessage::CheckRoom { room_id } => {
                self.check_room(conn_id, room_id.as_deref());
                Ok(())
            }
            InboundMessage::CreateRoom {
                room_name,
                max_users,
                user_name,
            } => self
                .create_room(
                    conn_id,
                    room_name.as_deref(),
                    max_users,
                    user_name.as_deref(),
                )
                .map(|_| ()),
            InboundMessage::JoinRoom { room_id, user_name } => {
                self.join_room(conn_id, room_id, user_name.as_deref())
            }
            InboundMessage::LeaveRoom { room_id } => {
                self.leave_room(conn_id, room_id);
                Ok(())
            }
            InboundMessage::KickUser {
                room_id,
                target_socket_id,
            } => self.kick_user(conn_id, room_id, target_socket_id),
            InboundMessage::Vote { room_id, vote } => self.vote(conn_id, room_id, &vote),
            InboundMessage::ShowVotes { room_id } => self.show_votes(conn_id, room_id),
            InboundMessage::ResetVotes { room_id } => self.reset_votes(conn_id, room_id),
            InboundMessage::AdminAuth { password } => {
                self.admin_auth(conn_id, password.as_deref());
                Ok(())
            }
            InboundMessage::AdminGetData {} => self.admin_get_data(conn_id),
            InboundMessage::AdminDeleteRoom { room_id } => {
                self.admin_delete_room(conn_id, room_id)
            }
            InboundMessage::AdminDeleteUser { room_id, user_id } => {
                self.admin_delete_user(conn_id, room_id, user_id)
            }
            InboundMessage::AdminNuke {} => self.admin_nuke(conn_id),
        };

        self.respond(conn_id, event, ack, result);
    }

    /// Answers a frame that could not be decoded.
    ///
    /// Undecodable admin operations from connections without the admin
    /// privilege are treated like any other unauthorized admin request.
    pub fn reject(&mut self, conn_id: ConnectionId, rejected: Rejected) {
        let Rejected { ack, event, error } = rejected;
        let event = event.unwrap_or_default();
        debug!(conn_id = %conn_id, event = %event, error = %error, "Malformed frame");

        let reply = match self.require_admin(&conn_id) {
            Err(denied) if is_privileged_event(&event) => denied,
            _ => AppError::validation(MALFORMED_REQUEST),
        };
        self.respond(conn_id, &event, ack, Err(reply));
    }

    /// Removes every trace of a closed connection.
    pub fn disconnect(&mut self, conn_id: ConnectionId) {
        let memberships = self.rooms.rooms_of(&conn_id);
        for room_id in &memberships {
            self.remove_member(*room_id, conn_id);
        }
        self.groups.unsubscribe_all(conn_id);
        self.names.forget(&conn_id);
        self.admins.revoke(&conn_id);

        if let Some(handle) = self.pool.remove(&conn_id) {
            handle.close();
            self.metrics.connection_closed();
        }
        info!(conn_id = %conn_id, rooms = memberships.len(), "Connection disconnected");

        if !memberships.is_empty() {
            self.broadcast_room_list();
        }
    }

    /// Current counts.
    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            rooms: self.rooms.len(),
            members: self
                .rooms
                .ids()
                .iter()
                .filter_map(|id| self.rooms.get(id))
                .map(|room| room.member_count())
                .sum(),
            registered: self.names.len(),
            admins: self.admins.privileged().len(),
            bans: self.bans.entry_count(),
        }
    }

    /// Read-only view of the room store.
    pub fn rooms(&self) -> &RoomStore {
        &self.rooms
    }

    /// Display name registered for a connection.
    pub fn registered_name(&self, conn_id: &ConnectionId) -> Option<&str> {
        self.names.name(conn_id)
    }

    /// Whether any room has a pending TTL timer.
    pub fn has_pending_expiries(&self) -> bool {
        !self.expiries.is_empty()
    }

    /// Waits for the next room TTL to elapse.
    ///
    /// Returns immediately with `None` when no timer is pending; guard
    /// calls with [`has_pending_expiries`](Self::has_pending_expiries).
    pub async fn next_expiry(&mut self) -> Option<RoomId> {
        self.expiries.next().await.map(|expired| expired.into_inner())
    }
}
