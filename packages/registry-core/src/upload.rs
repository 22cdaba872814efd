use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Identifies one submission attempt. Unique for the life of the process so
/// a late timer from an abandoned form can never settle a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadTicket(pub Uuid);

impl UploadTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UploadTicket {
    fn default() -> Self {
        Self::new()
    }
}

/// Deferred events fed back into the coordinator by background timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    UploadElapsed(UploadTicket),
}

/// Handle to a scheduled upload resolution. Dropping it cancels the timer.
#[derive(Debug)]
pub struct PendingUpload {
    ticket: UploadTicket,
    handle: JoinHandle<()>,
}

impl PendingUpload {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!("Cancelling pending upload {:?}", self.ticket);
        }
        self.handle.abort();
    }
}

/// One-shot timer standing in for the network round trip.
#[derive(Debug, Clone)]
pub struct UploadTimer {
    delay: Duration,
    events: UnboundedSender<AppEvent>,
}

impl UploadTimer {
    pub fn new(delay: Duration, events: UnboundedSender<AppEvent>) -> Self {
        Self { delay, events }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, ticket: UploadTicket) -> PendingUpload {
        let delay = self.delay;
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver may be gone if the front-end already shut down.
            let _ = events.send(AppEvent::UploadElapsed(ticket));
        });
        PendingUpload { ticket, handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = unbounded_channel();
        let timer = UploadTimer::new(Duration::from_millis(2000), tx);
        let ticket = UploadTicket::new();
        let pending = timer.schedule(ticket);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(AppEvent::UploadElapsed(ticket)));
        assert_eq!(pending.ticket(), ticket);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = unbounded_channel();
        let timer = UploadTimer::new(Duration::from_millis(2000), tx);
        let pending = timer.schedule(UploadTicket::new());
        drop(pending);
        drop(timer);

        tokio::time::sleep(Duration::from_secs(5)).await;
        // All senders are gone and nothing was sent.
        assert_eq!(rx.recv().await, None);
    }
}
