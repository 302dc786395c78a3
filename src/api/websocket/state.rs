//! Shared relay state

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::RelayConfig;
use crate::policies::{EventPipeline, FilterPipeline};
use crate::store::{EventStore, EventWindow};
use crate::types::{Event, Timestamp};
use crate::utils::current_timestamp;

/// Shared application state for every connection
pub struct AppState {
    /// The event window
    pub window: Arc<EventWindow>,

    /// Gate for inbound events
    pub event_policies: EventPipeline,

    /// Gate for subscription and count filters
    pub filter_policies: FilterPipeline,

    /// Open subscriptions allowed per connection
    pub max_subscriptions: usize,

    /// Broadcast channel fanning accepted events out to live subscriptions
    event_tx: broadcast::Sender<Arc<Event>>,

    /// Currently open WebSocket connections
    connections: AtomicUsize,

    /// Unix timestamp the relay started at
    started_at: Timestamp,
}

impl AppState {
    /// Create state around `window` with policies taken from `config`
    pub fn new(window: Arc<EventWindow>, config: &RelayConfig) -> Self {
        // Slow clients that fall this far behind get a lag notice
        let (event_tx, _) = broadcast::channel(config.broadcast_capacity.max(1));

        Self {
            window,
            event_policies: config.event_pipeline(),
            filter_policies: config.filter_pipeline(),
            max_subscriptions: config.max_subscriptions,
            event_tx,
            connections: AtomicUsize::new(0),
            started_at: current_timestamp(),
        }
    }

    /// The storage contract the relay talks to
    pub fn store(&self) -> &dyn EventStore {
        self.window.as_ref()
    }

    /// Fan an accepted event out to every connection
    pub fn publish(&self, event: Arc<Event>) {
        // Ignore send errors - they just mean no receivers are listening
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to accepted events
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Event>> {
        self.event_tx.subscribe()
    }

    /// Record a new connection, returning the open count
    pub fn connection_opened(&self) -> usize {
        self.connections.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Record a closed connection, returning the open count
    pub fn connection_closed(&self) -> usize {
        self.connections.fetch_sub(1, Ordering::SeqCst).saturating_sub(1)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }
}
