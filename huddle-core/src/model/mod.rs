mod peer;
mod room;
mod signaling;

pub use peer::PeerId;
pub use room::{RoomId, RosterEntry};
pub use signaling::{Relay, SignalMessage};
