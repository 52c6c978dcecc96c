use crate::room::Outbox;
use huddle_core::{PeerId, RoomId, RosterEntry, SignalMessage};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

pub(super) struct Peer {
    pub(super) outbox: Outbox,
    pub(super) room: Option<RoomId>,
    pub(super) mic_on: bool,
}

/// Both maps live behind one lock: every id listed in `rooms` has an entry
/// in `peers` whenever the lock is released.
#[derive(Default)]
pub(super) struct RegistryInner {
    pub(super) peers: HashMap<PeerId, Peer>,
    pub(super) rooms: HashMap<RoomId, Vec<PeerId>>,
}

/// Read-only copy of one connection's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerView {
    pub id: PeerId,
    pub room: Option<RoomId>,
    pub mic_on: bool,
}

/// Result of a successful [`Registry::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// The room the connection was moved out of, if it was in a different one.
    pub previous: Option<RoomId>,
}

/// Connection registry and room membership table of the whole process.
#[derive(Default)]
pub struct Registry {
    inner: Mutex<RegistryInner>,
}

impl RegistryInner {
    /// Takes `id` out of its room, dropping the room once it is empty.
    fn detach(&mut self, id: &PeerId) -> Option<RoomId> {
        let room = self.peers.get_mut(id)?.room.take()?;

        if let Some(members) = self.rooms.get_mut(&room) {
            members.retain(|member| member != id);
            if members.is_empty() {
                self.rooms.remove(&room);
            }
        }

        Some(room)
    }

    /// Members of `room` that are still registered, in join order.
    pub(super) fn roster(&self, room: &RoomId) -> Vec<RosterEntry> {
        let Some(members) = self.rooms.get(room) else {
            return Vec::new();
        };

        members
            .iter()
            .filter_map(|id| {
                self.peers.get(id).map(|peer| RosterEntry {
                    id: id.clone(),
                    mic_on: peer.mic_on,
                })
            })
            .collect()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // Every critical section leaves both maps consistent before it can panic.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, id: PeerId, outbox: Outbox) -> PeerView {
        self.lock().peers.insert(
            id.clone(),
            Peer {
                outbox,
                room: None,
                mic_on: true,
            },
        );

        PeerView {
            id,
            room: None,
            mic_on: true,
        }
    }

    pub fn lookup(&self, id: &PeerId) -> Option<PeerView> {
        let inner = self.lock();
        inner.peers.get(id).map(|peer| PeerView {
            id: id.clone(),
            room: peer.room.clone(),
            mic_on: peer.mic_on,
        })
    }

    /// Puts `id` into `room`. Joining the current room again changes nothing;
    /// joining another room leaves the old one first.
    pub fn join(&self, id: &PeerId, room: RoomId) -> Option<Joined> {
        let mut inner = self.lock();

        let current = inner.peers.get(id)?.room.clone();
        if current.as_ref() == Some(&room) {
            return Some(Joined { previous: None });
        }

        let previous = inner.detach(id);
        if let Some(peer) = inner.peers.get_mut(id) {
            peer.room = Some(room.clone());
        }

        let members = inner.rooms.entry(room.clone()).or_default();
        if !members.contains(id) {
            members.push(id.clone());
        }

        info!("User {} joined room {}", id, room);
        Some(Joined { previous })
    }

    /// Returns the room that was left.
    pub fn leave(&self, id: &PeerId) -> Option<RoomId> {
        let room = self.lock().detach(id)?;
        info!("User {} left room {}", id, room);
        Some(room)
    }

    /// Returns the room whose roster changed.
    pub fn set_mic(&self, id: &PeerId, on: bool) -> Option<RoomId> {
        let mut inner = self.lock();
        let peer = inner.peers.get_mut(id)?;
        peer.mic_on = on;
        peer.room.clone()
    }

    /// Drops the connection and its membership in one step. A second call
    /// for the same id returns `None`.
    pub fn remove(&self, id: &PeerId) -> Option<PeerView> {
        let mut inner = self.lock();
        let room = inner.detach(id);
        let peer = inner.peers.remove(id)?;

        Some(PeerView {
            id: id.clone(),
            room,
            mic_on: peer.mic_on,
        })
    }

    pub fn roster(&self, room: &RoomId) -> Vec<RosterEntry> {
        self.lock().roster(room)
    }

    /// Raw member list of `room`, live or not.
    pub fn members(&self, room: &RoomId) -> Vec<PeerId> {
        self.lock().rooms.get(room).cloned().unwrap_or_default()
    }

    pub fn peer_count(&self) -> usize {
        self.lock().peers.len()
    }

    pub fn room_count(&self) -> usize {
        self.lock().rooms.len()
    }

    /// Enqueue `msg` for `to`. A target that is not registered is a silent miss.
    pub fn send(&self, to: &PeerId, msg: &SignalMessage) -> bool {
        let frame = match msg.encode() {
            Ok(frame) => frame,
            Err(e) => {
                error!("Failed to serialize {} message: {}", msg.kind(), e);
                return false;
            }
        };

        let inner = self.lock();
        match inner.peers.get(to) {
            Some(peer) => peer.outbox.push(to, frame),
            None => {
                debug!("Dropping {} for unknown peer {}", msg.kind(), to);
                false
            }
        }
    }
}
