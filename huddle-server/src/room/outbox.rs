use huddle_core::PeerId;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tracing::{debug, warn};

/// Frames buffered per connection before the peer is considered too slow.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

/// Bounded outbound queue of one connection, drained by its writer task.
///
/// Pushing never waits. A full queue evicts the connection instead of
/// stalling whoever is sending to it.
#[derive(Clone, Debug)]
pub struct Outbox {
    tx: mpsc::Sender<String>,
    evicted: Arc<Notify>,
}

impl Outbox {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let outbox = Self {
            tx,
            evicted: Arc::new(Notify::new()),
        };
        (outbox, rx)
    }

    /// Completes once the connection overflowed its queue. The permit is
    /// stored, so waiting after the fact still returns immediately.
    pub async fn evicted(&self) {
        self.evicted.notified().await
    }

    pub(crate) fn push(&self, peer_id: &PeerId, frame: String) -> bool {
        match self.tx.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Outbound queue full for {}, evicting", peer_id);
                self.evicted.notify_one();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Writer for {} already gone, dropping frame", peer_id);
                false
            }
        }
    }
}
