//! Room and member state as broadcast to clients.

use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use poker_core::types::{ConnectionId, RoomId};

/// Card deck a room votes with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VotingPattern {
    /// 0, 1, 2, 3, 5, 8, 13, ...
    #[default]
    Fibonacci,
}

/// A member of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomUser {
    /// The member's connection.
    pub id: ConnectionId,
    /// Display name copied at join time.
    pub name: String,
    /// `None` until the member votes in the current round.
    pub vote: Option<String>,
    /// Remote address captured at join time, used for bans.
    #[serde(skip)]
    pub address: Option<IpAddr>,
}

impl RoomUser {
    /// A fresh member without a vote.
    pub fn new(id: ConnectionId, name: impl Into<String>, address: Option<IpAddr>) -> Self {
        Self {
            id,
            name: name.into(),
            vote: None,
            address,
        }
    }
}

/// An active planning room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Unique, sanitized name.
    pub name: String,
    /// Current owner; always a key of `users` while the room exists.
    pub owner: ConnectionId,
    /// Capacity.
    pub max_users: usize,
    /// Members in join order.
    pub users: IndexMap<ConnectionId, RoomUser>,
    /// Whether the current round has been revealed.
    pub votes_visible: bool,
    /// Deck in use.
    pub voting_pattern: VotingPattern,
    /// Creation time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Forced destruction time.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Room {
    /// Creates an empty room owned by `owner`. The owner still has to join.
    pub fn new(
        id: RoomId,
        name: String,
        owner: ConnectionId,
        max_users: usize,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            id,
            name,
            owner,
            max_users,
            users: IndexMap::new(),
            votes_visible: false,
            voting_pattern: VotingPattern::default(),
            created_at: now,
            expires_at,
        }
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.users.len()
    }

    /// Whether nobody is left.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Whether membership reached capacity.
    pub fn is_full(&self) -> bool {
        self.users.len() >= self.max_users
    }

    /// Whether the connection is a member.
    pub fn has_member(&self, conn_id: &ConnectionId) -> bool {
        self.users.contains_key(conn_id)
    }

    /// Whether the connection owns the room.
    pub fn is_owner(&self, conn_id: &ConnectionId) -> bool {
        self.owner == *conn_id && self.has_member(conn_id)
    }

    /// Whether the room's lifetime has run out at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Adds (or replaces) a member with a cleared vote.
    pub fn add_member(&mut self, user: RoomUser) {
        self.users.insert(user.id, user);
    }

    /// Removes a member, handing ownership to the earliest remaining member
    /// when the owner leaves. Returns the removed member and the new owner,
    /// if ownership moved.
    pub fn remove_member(
        &mut self,
        conn_id: &ConnectionId,
    ) -> (Option<RoomUser>, Option<ConnectionId>) {
        let removed = self.users.shift_remove(conn_id);
        let mut new_owner = None;
        if self.owner == *conn_id {
            if let Some(next) = self.users.keys().next().copied() {
                self.owner = next;
                new_owner = Some(next);
            }
        }
        (removed, new_owner)
    }

    /// Records a member's vote. Returns false when the caller is not a member.
    pub fn cast_vote(&mut self, conn_id: &ConnectionId, vote: String) -> bool {
        match self.users.get_mut(conn_id) {
            Some(user) => {
                user.vote = Some(vote);
                true
            }
            None => false,
        }
    }

    /// Makes the round's votes visible. Vote values are untouched.
    pub fn reveal(&mut self) {
        self.votes_visible = true;
    }

    /// Starts a new round: hides votes and clears every member's vote.
    pub fn reset_votes(&mut self) {
        self.votes_visible = false;
        for user in self.users.values_mut() {
            user.vote = None;
        }
    }

    /// Lobby listing entry.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            owner_name: self
                .users
                .get(&self.owner)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "N/A".to_string()),
            user_count: self.users.len(),
            max_users: self.max_users,
        }
    }
}

/// Lobby listing entry for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    /// Room identifier.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Owner's display name, "N/A" when unknown.
    pub owner_name: String,
    /// Current member count.
    pub user_count: usize,
    /// Capacity.
    pub max_users: usize,
}
