//! Runs dispatches off the event loop and reports back over a channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, instrument};

use crate::context::{Completion, Dispatch};
use crate::engine::RulesEngine;
use crate::lifecycle::Announcement;

/// Messages delivered back to the event loop.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A dispatched request finished.
    Completed(Completion),
    /// A deferred game-over announcement is due.
    Announce(Announcement),
}

/// Spawns rules-engine calls and deferred announcements.
#[derive(Clone)]
pub struct Driver {
    engine: Arc<dyn RulesEngine>,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
    announce_delay: Duration,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("announce_delay", &self.announce_delay)
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Creates a driver and the receiver its events arrive on.
    pub fn new(
        engine: Arc<dyn RulesEngine>,
        announce_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ClientEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                engine,
                event_tx,
                announce_delay,
            },
            event_rx,
        )
    }

    /// Runs `dispatch` in the background.
    #[instrument(skip(self), fields(seq = dispatch.seq, request = %dispatch.request))]
    pub fn submit(&self, dispatch: Dispatch) {
        let engine = Arc::clone(&self.engine);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let completion = dispatch.run(engine.as_ref()).await;
            debug!(seq = completion.seq, ok = completion.result.is_ok(), "Request finished");
            // The receiver is gone only when the UI has shut down.
            let _ = event_tx.send(ClientEvent::Completed(completion));
        });
    }

    /// Delivers `announcement` after the configured delay, so the final
    /// position is on screen first.
    pub fn announce_later(&self, announcement: Announcement) {
        let event_tx = self.event_tx.clone();
        let delay = self.announce_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = event_tx.send(ClientEvent::Announce(announcement));
        });
    }
}
