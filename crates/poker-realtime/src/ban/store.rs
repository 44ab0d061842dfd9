//! Ban store keyed by room, then by name or address.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};

use poker_core::types::RoomId;

/// What a ban entry matches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BanKey {
    /// A display name.
    Name(String),
    /// A network address.
    Address(IpAddr),
}

impl fmt::Display for BanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name:{name}"),
            Self::Address(addr) => write!(f, "addr:{addr}"),
        }
    }
}

/// Builds the keys identifying a user. Blank names are ignored.
pub fn keys_for(name: Option<&str>, address: Option<IpAddr>) -> Vec<BanKey> {
    let mut keys = Vec::with_capacity(2);
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        keys.push(BanKey::Name(name.to_string()));
    }
    if let Some(addr) = address {
        keys.push(BanKey::Address(addr));
    }
    keys
}

/// Room id → ban key → expiry.
#[derive(Debug, Default)]
pub struct BanStore {
    rooms: HashMap<RoomId, HashMap<BanKey, DateTime<Utc>>>,
}

impl BanStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bans a name and/or address from a room until `now + duration`.
    /// Returns the number of entries written.
    pub fn ban(
        &mut self,
        room_id: RoomId,
        name: Option<&str>,
        address: Option<IpAddr>,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> usize {
        let keys = keys_for(name, address);
        if keys.is_empty() {
            return 0;
        }
        let until = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let entries = self.rooms.entry(room_id).or_default();
        for key in &keys {
            tracing::debug!(room_id = %room_id, key = %key, until = %until, "Ban recorded");
            entries.insert(key.clone(), until);
        }
        keys.len()
    }

    /// Whether the name or address is banned from the room. Expired entries
    /// for the room are pruned first.
    pub fn is_banned(
        &mut self,
        room_id: &RoomId,
        name: Option<&str>,
        address: Option<IpAddr>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(entries) = self.rooms.get_mut(room_id) else {
            return false;
        };
        entries.retain(|_, until| *until > now);
        let banned = keys_for(name, address)
            .iter()
            .any(|key| entries.contains_key(key));
        if entries.is_empty() {
            self.rooms.remove(room_id);
        }
        banned
    }

    /// Drops every entry of a room.
    pub fn clear(&mut self, room_id: &RoomId) -> usize {
        self.rooms.remove(room_id).map(|e| e.len()).unwrap_or(0)
    }

    /// Drops every entry of every room.
    pub fn clear_all(&mut self) -> usize {
        let total = self.entry_count();
        self.rooms.clear();
        total
    }

    /// Prunes expired entries across all rooms. Returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.rooms.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|_, until| *until > now);
            removed += before - entries.len();
            !entries.is_empty()
        });
        removed
    }

    /// Total live and not-yet-pruned entries.
    pub fn entry_count(&self) -> usize {
        self.rooms.values().map(HashMap::len).sum()
    }
}
