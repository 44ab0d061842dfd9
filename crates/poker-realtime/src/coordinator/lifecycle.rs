//! Room expiry and the periodic sweep.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use poker_core::types::RoomId;

use super::{REASON_EMPTY, REASON_EXPIRED, SessionCoordinator};

/// What one sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Rooms destroyed because their TTL passed.
    pub expired: usize,
    /// Rooms destroyed because nobody was left in them.
    pub emptied: usize,
    /// Ban entries pruned.
    pub bans_pruned: usize,
}

impl SweepReport {
    /// Rooms destroyed in total.
    pub fn rooms_destroyed(&self) -> usize {
        self.expired + self.emptied
    }
}

impl SessionCoordinator {
    /// Handles a fired TTL timer. Rooms already gone are ignored.
    pub fn expire_room(&mut self, room_id: RoomId) -> bool {
        self.expiry_keys.remove(&room_id);
        let destroyed = self.destroy_room(room_id, REASON_EXPIRED);
        if destroyed {
            self.broadcast_room_list();
        } else {
            debug!(room_id = %room_id, "Expiry fired for a room that no longer exists");
        }
        destroyed
    }

    /// Destroys rooms past their TTL (and, when enabled, rooms without
    /// members) and prunes expired bans.
    pub fn sweep(&mut self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        for room_id in self.rooms.expired_ids(now) {
            if self.destroy_room(room_id, REASON_EXPIRED) {
                report.expired += 1;
            }
        }
        if self.settings.sweep_empty_rooms {
            for room_id in self.rooms.empty_ids() {
                if self.destroy_room(room_id, REASON_EMPTY) {
                    report.emptied += 1;
                }
            }
        }
        report.bans_pruned = self.bans.purge_expired(now);

        if report.rooms_destroyed() > 0 {
            self.broadcast_room_list();
            info!(
                expired = report.expired,
                emptied = report.emptied,
                bans_pruned = report.bans_pruned,
                "Sweep destroyed rooms"
            );
        } else {
            debug!(bans_pruned = report.bans_pruned, "Sweep found nothing to destroy");
        }
        report
    }
}
