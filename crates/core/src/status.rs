//! Shared status slot.

use lottery_types::Status;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Single-slot channel holding the latest [`Status`].
///
/// Writers overwrite; readers see only the most recent value. Publishing
/// never waits for a reader.
#[derive(Debug, Clone)]
pub struct StatusChannel {
    tx: Arc<watch::Sender<Status>>,
}

impl StatusChannel {
    /// Create a channel holding a cleared status.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Status::cleared());
        Self { tx: Arc::new(tx) }
    }

    /// Replace the current status.
    pub fn publish(&self, status: Status) {
        debug!(kind = ?status.kind, message = %status.message, "Status");
        self.tx.send_replace(status);
    }

    /// Clear the current status.
    pub fn clear(&self) {
        self.publish(Status::cleared());
    }

    /// The current status.
    pub fn latest(&self) -> Status {
        self.tx.borrow().clone()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }
}

impl Default for StatusChannel {
    fn default() -> Self {
        Self::new()
    }
}
