//! Room lifecycle, capacity, and moderation settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest accepted room lifetime or ban duration: one year.
///
/// Timer wheels reject delays of roughly two years and more.
pub const MAX_DURATION_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Room coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsConfig {
    /// Maximum number of rooms that may exist at once.
    #[serde(default = "default_max_rooms")]
    pub max_rooms: usize,
    /// Capacity used when a create request omits `maxUsers`.
    #[serde(default = "default_max_users")]
    pub default_max_users: usize,
    /// Upper clamp applied to requested room capacity.
    #[serde(default = "default_max_users_limit")]
    pub max_users_limit: usize,
    /// Maximum characters kept from display names and room names.
    #[serde(default = "default_name_max_chars")]
    pub name_max_chars: usize,
    /// Fixed room lifetime in seconds.
    #[serde(default = "default_room_ttl")]
    pub room_ttl_seconds: u64,
    /// How long a kicked user stays banned from the room, in seconds.
    #[serde(default = "default_ban_duration")]
    pub ban_duration_seconds: u64,
    /// Interval between lifecycle sweeps, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Whether the sweeper also removes rooms without members.
    #[serde(default = "default_true")]
    pub sweep_empty_rooms: bool,
    /// Longest accepted vote value, in characters.
    #[serde(default = "default_max_vote_chars")]
    pub max_vote_chars: usize,
}

impl RoomsConfig {
    /// Rejects durations the timers cannot represent.
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("rooms.room_ttl_seconds", self.room_ttl_seconds),
            ("rooms.ban_duration_seconds", self.ban_duration_seconds),
            ("rooms.sweep_interval_seconds", self.sweep_interval_seconds),
        ] {
            if value > MAX_DURATION_SECONDS {
                return Err(AppError::configuration(format!(
                    "{field} = {value} exceeds the maximum of {MAX_DURATION_SECONDS}"
                )));
            }
        }
        Ok(())
    }

    /// Room lifetime as a [`Duration`], capped at [`MAX_DURATION_SECONDS`].
    pub fn room_ttl(&self) -> Duration {
        Duration::from_secs(self.room_ttl_seconds.min(MAX_DURATION_SECONDS))
    }

    /// Ban lifetime as a [`Duration`], capped at [`MAX_DURATION_SECONDS`].
    pub fn ban_duration(&self) -> Duration {
        Duration::from_secs(self.ban_duration_seconds.min(MAX_DURATION_SECONDS))
    }

    /// Sweep period as a [`Duration`]. Never zero.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.clamp(1, MAX_DURATION_SECONDS))
    }
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            max_rooms: default_max_rooms(),
            default_max_users: default_max_users(),
            max_users_limit: default_max_users_limit(),
            name_max_chars: default_name_max_chars(),
            room_ttl_seconds: default_room_ttl(),
            ban_duration_seconds: default_ban_duration(),
            sweep_interval_seconds: default_sweep_interval(),
            sweep_empty_rooms: true,
            max_vote_chars: default_max_vote_chars(),
        }
    }
}

fn default_max_rooms() -> usize {
    30
}

fn default_max_users() -> usize {
    10
}

fn default_max_users_limit() -> usize {
    50
}

fn default_name_max_chars() -> usize {
    20
}

fn default_room_ttl() -> u64 {
    60 * 60
}

fn default_ban_duration() -> u64 {
    60
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_max_vote_chars() -> usize {
    16
}
