//! Inbound and outbound WebSocket message type definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use poker_core::types::{ConnectionId, RoomId};

use crate::room::{Room, RoomSummary};

/// Events sent by the client to the server.
///
/// Decoded from `{"event": "...", "data": {...}}`. Name-like fields that
/// are not JSON strings decode as `None` so the fallback rules apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum InboundMessage {
    /// Set the connection's display name.
    Register {
        /// Requested display name.
        #[serde(default, deserialize_with = "lenient_string")]
        name: Option<String>,
    },
    /// Ask for the lobby listing.
    GetRoomList {},
    /// Ask whether a room exists.
    CheckRoom {
        /// Any string; unknown or malformed ids simply do not exist.
        #[serde(default, deserialize_with = "lenient_string")]
        room_id: Option<String>,
    },
    /// Open a new room and join it.
    CreateRoom {
        /// Requested room name.
        #[serde(default, deserialize_with = "lenient_string")]
        room_name: Option<String>,
        /// Requested capacity.
        #[serde(default, deserialize_with = "lenient_count")]
        max_users: Option<u64>,
        /// Display name to register first.
        #[serde(default, deserialize_with = "lenient_string")]
        user_name: Option<String>,
    },
    /// Join an existing room.
    JoinRoom {
        /// Target room.
        room_id: RoomId,
        /// Display name to register first.
        #[serde(default, deserialize_with = "lenient_string")]
        user_name: Option<String>,
    },
    /// Leave a room.
    LeaveRoom {
        /// Room to leave.
        room_id: RoomId,
    },
    /// Owner removes and bans a member.
    KickUser {
        /// Room of the target.
        room_id: RoomId,
        /// Connection being kicked.
        target_socket_id: ConnectionId,
    },
    /// Cast a vote in the current round.
    Vote {
        /// Room voted in.
        room_id: RoomId,
        /// Raw vote value; validated by the coordinator.
        #[serde(default)]
        vote: Value,
    },
    /// Owner reveals the round.
    ShowVotes {
        /// Target room.
        room_id: RoomId,
    },
    /// Owner starts a new round.
    ResetVotes {
        /// Target room.
        room_id: RoomId,
    },
    /// Authenticate as administrator.
    AdminAuth {
        /// Shared secret candidate.
        #[serde(default, deserialize_with = "lenient_string")]
        password: Option<String>,
    },
    /// Fetch the full room store.
    AdminGetData {},
    /// Destroy one room.
    AdminDeleteRoom {
        /// Target room.
        room_id: RoomId,
    },
    /// Remove and ban one member of a room.
    AdminDeleteUser {
        /// Target room.
        room_id: RoomId,
        /// Connection being removed.
        user_id: ConnectionId,
    },
    /// Destroy every room and clear all bans.
    AdminNuke {},
}

impl InboundMessage {
    /// Wire name of the event, for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::GetRoomList {} => "getRoomList",
            Self::CheckRoom { .. } => "checkRoom",
            Self::CreateRoom { .. } => "createRoom",
            Self::JoinRoom { .. } => "joinRoom",
            Self::LeaveRoom { .. } => "leaveRoom",
            Self::KickUser { .. } => "kickUser",
            Self::Vote { .. } => "vote",
            Self::ShowVotes { .. } => "showVotes",
            Self::ResetVotes { .. } => "resetVotes",
            Self::AdminAuth { .. } => "adminAuth",
            Self::AdminGetData {} => "adminGetData",
            Self::AdminDeleteRoom { .. } => "adminDeleteRoom",
            Self::AdminDeleteUser { .. } => "adminDeleteUser",
            Self::AdminNuke {} => "adminNuke",
        }
    }

}

/// Whether `event` names an operation behind the admin gate.
///
/// `adminAuth` is not one of them: anyone may try to authenticate.
pub fn is_privileged_event(event: &str) -> bool {
    matches!(
        event,
        "adminGetData" | "adminDeleteRoom" | "adminDeleteUser" | "adminNuke"
    )
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum OutboundMessage {
    /// Full state of the room the client is in.
    RoomStateUpdated(Room),
    /// Lobby listing.
    RoomListUpdated(Vec<RoomSummary>),
    /// A request from this client failed.
    RoomError {
        /// Human-readable reason.
        message: String,
    },
    /// The room was destroyed.
    RoomExpired {
        /// Why it was destroyed.
        message: String,
    },
    /// The client was kicked from its room.
    Kicked {},
    /// Answer to `checkRoom`.
    RoomCheckResult {
        /// Whether the room exists.
        exists: bool,
        /// The room, when it exists.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_data: Option<Room>,
    },
    /// Full room store snapshot for administrators.
    AdminDataUpdated(IndexMap<RoomId, Room>),
    /// Answer to `adminAuth`.
    AdminAuthResult {
        /// Whether privilege was granted.
        success: bool,
    },
    /// Acknowledgment of a request that carried an `ack` id.
    Ack {
        /// The request's ack id.
        id: u64,
        /// Whether the request took effect.
        success: bool,
        /// Failure reason, when one may be shown.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl OutboundMessage {
    /// A `roomError` with the given text.
    pub fn room_error(message: impl Into<String>) -> Self {
        Self::RoomError {
            message: message.into(),
        }
    }

    /// A `roomExpired` with the given reason.
    pub fn room_expired(message: impl Into<String>) -> Self {
        Self::RoomExpired {
            message: message.into(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64())
}
