use crate::room::Registry;
use huddle_core::{PeerId, Relay, SignalMessage};
use tracing::debug;

/// Apply one inbound message from `peer_id`.
///
/// Routing misses and server-only message types are dropped without
/// telling the sender.
pub fn route(registry: &Registry, peer_id: &PeerId, msg: SignalMessage) {
    match msg {
        SignalMessage::Join { room } => {
            let Some(joined) = registry.join(peer_id, room.clone()) else {
                return;
            };
            if let Some(previous) = joined.previous {
                registry.broadcast_roster(&previous);
            }
            registry.broadcast_roster(&room);
        }

        SignalMessage::Leave => {
            if let Some(room) = registry.leave(peer_id) {
                registry.broadcast_roster(&room);
            }
        }

        SignalMessage::Mic { mic_on: Some(on) } => {
            if let Some(room) = registry.set_mic(peer_id, on) {
                registry.broadcast_roster(&room);
            }
        }

        SignalMessage::Offer(relay) => relay_to(registry, peer_id, relay, SignalMessage::Offer),
        SignalMessage::Answer(relay) => relay_to(registry, peer_id, relay, SignalMessage::Answer),
        SignalMessage::Candidate(relay) => {
            relay_to(registry, peer_id, relay, SignalMessage::Candidate)
        }

        other => debug!("Ignoring {} message from {}", other.kind(), peer_id),
    }
}

fn relay_to(
    registry: &Registry,
    peer_id: &PeerId,
    mut relay: Relay,
    wrap: fn(Relay) -> SignalMessage,
) {
    relay.from = Some(peer_id.clone());
    let to = relay.to.clone();
    registry.send(&to, &wrap(relay));
}
