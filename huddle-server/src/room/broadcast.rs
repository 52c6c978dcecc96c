use crate::room::Registry;
use huddle_core::{RoomId, SignalMessage};
use tracing::{debug, error};

impl Registry {
    /// Push the current `user_list` of `room` to each of its members.
    ///
    /// The roster is taken and fanned out under a single lock, so every
    /// recipient of one call sees the same list. Returns how many members
    /// accepted the frame.
    pub fn broadcast_roster(&self, room: &RoomId) -> usize {
        let inner = self.lock();
        let users = inner.roster(room);
        if users.is_empty() {
            return 0;
        }

        let msg = SignalMessage::UserList {
            users: users.clone(),
        };
        let frame = match msg.encode() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize roster for room {}: {}", room, e);
                return 0;
            }
        };

        let mut delivered = 0;
        for entry in &users {
            let Some(peer) = inner.peers.get(&entry.id) else {
                continue;
            };
            if peer.outbox.push(&entry.id, frame.clone()) {
                delivered += 1;
            }
        }

        debug!(
            "Roster of room {} sent to {}/{} members",
            room,
            delivered,
            users.len()
        );
        delivered
    }
}
