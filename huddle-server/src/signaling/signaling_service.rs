use crate::room::{Outbox, Registry};
use crate::signaling::route;
use huddle_core::{PeerId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

struct SignalingInner {
    registry: Registry,
    outbox_capacity: usize,
}

/// Shared handle given to every connection handler.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(outbox_capacity: usize) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                registry: Registry::new(),
                outbox_capacity,
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// Registers a new connection under a fresh id and queues the `id`
    /// greeting as its first outbound frame.
    pub fn connect(&self) -> (PeerId, Outbox, mpsc::Receiver<String>) {
        let peer_id = PeerId::new();
        let (outbox, rx) = Outbox::new(self.inner.outbox_capacity);

        self.registry().register(peer_id.clone(), outbox.clone());
        self.registry().send(
            &peer_id,
            &SignalMessage::Id {
                id: peer_id.clone(),
            },
        );

        info!("New connection: {}", peer_id);
        (peer_id, outbox, rx)
    }

    pub fn dispatch(&self, peer_id: &PeerId, msg: SignalMessage) {
        route(self.registry(), peer_id, msg);
    }

    /// Teardown of a connection. Safe to call more than once.
    pub fn disconnect(&self, peer_id: &PeerId) {
        let Some(removed) = self.registry().remove(peer_id) else {
            return;
        };

        match removed.room {
            Some(room) => {
                info!("User {} disconnected from room {}", peer_id, room);
                self.registry().broadcast_roster(&room);
            }
            None => info!("User {} disconnected", peer_id),
        }
    }
}
