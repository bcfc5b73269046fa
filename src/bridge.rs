//! # Message Bridge
//!
//! Bounded FIFO between the transport task (producer) and the render loop
//! (consumer).
//!
//! ```text
//! transport task ──Publisher::publish()──▶ [ capacity N ] ──Subscription::receive()──▶ render loop
//! ```
//!
//! ## Overflow policy
//!
//! A full queue blocks the producer for at most `publish_timeout`. If there
//! is still no room the incoming event is dropped and counted; the network
//! side never stalls longer than that per message.
//!
//! ## Closing
//!
//! `Subscription::close()` stops intake. After that `publish()` returns
//! [`PublishOutcome::Closed`] without waiting; it never panics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use crate::core::message::InboundEvent;

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 200;
/// Default producer wait on a full queue.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    /// Queue stayed full past the timeout; the event was discarded.
    Dropped,
    /// The consumer closed the bridge; nothing was queued.
    Closed,
}

/// Create a bridge with the given capacity (minimum 1).
pub fn channel(capacity: usize) -> (Publisher, Subscription) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    (
        Publisher {
            tx,
            dropped: dropped.clone(),
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        },
        Subscription { rx, dropped },
    )
}

/// Producer half. The only thing the transport can touch.
#[derive(Clone)]
pub struct Publisher {
    tx: mpsc::Sender<InboundEvent>,
    dropped: Arc<AtomicU64>,
    publish_timeout: Duration,
}

impl Publisher {
    pub fn with_timeout(mut self, publish_timeout: Duration) -> Self {
        self.publish_timeout = publish_timeout;
        self
    }

    pub async fn publish(&self, event: InboundEvent) -> PublishOutcome {
        match self.tx.send_timeout(event, self.publish_timeout).await {
            Ok(()) => PublishOutcome::Delivered,
            Err(SendTimeoutError::Timeout(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("Bridge full, dropped inbound event ({total} dropped so far): {event:?}");
                PublishOutcome::Dropped
            }
            Err(SendTimeoutError::Closed(_)) => {
                debug!("Bridge closed, publish ignored");
                PublishOutcome::Closed
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the render loop.
pub struct Subscription {
    rx: mpsc::Receiver<InboundEvent>,
    dropped: Arc<AtomicU64>,
}

impl Subscription {
    /// Wait for the next event. Exactly one event per call, in publish order.
    ///
    /// Returns `None` once the bridge is closed (or every publisher is gone)
    /// and the queue is empty. Cancel-safe, so it can sit in a `select!`.
    pub async fn receive(&mut self) -> Option<InboundEvent> {
        self.rx.recv().await
    }

    /// Stop accepting new events. Later publishes are no-ops.
    pub fn close(&mut self) {
        self.rx.close();
    }

    /// How many events overflow has discarded.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
