//! Event storage
//!
//! This module defines the storage contract consumed by the relay wiring
//! and its one implementation for ephemeral events:
//! - `EventStore`: save / query / count / replace / delete
//! - `EventWindow`: bounded ring that overwrites its oldest event
//! - `matches`: the filter predicate used to answer queries
//!
//! # Data flow
//!
//! ```text
//! inbound event ──► policies ──► save_event ──► EventWindow (evicts oldest)
//! subscription  ──► policies ──► query_events ──► matches() per slot ──► results
//! ```

mod error;
mod matcher;
mod stats;
mod window;

use std::sync::Arc;

use crate::types::{Event, Filter};

pub use error::{StoreError, StoreResult};
pub use matcher::matches;
pub use stats::WindowStats;
pub use window::EventWindow;

/// Storage contract shared by every event backend
///
/// Every call is synchronous and must be safe to invoke concurrently
/// without external locking.
pub trait EventStore: Send + Sync {
    /// Add an event; `None` is rejected with `StoreError::InvalidInput`
    fn save_event(&self, event: Option<Arc<Event>>) -> StoreResult<()>;

    /// Events matching `filter`, in store order
    fn query_events(&self, filter: &Filter) -> StoreResult<Vec<Arc<Event>>>;

    /// Number of events matching `filter`
    fn count_events(&self, filter: &Filter) -> StoreResult<usize> {
        self.query_events(filter).map(|events| events.len())
    }

    /// Replace a stored event with the same identity
    fn replace_event(&self, event: &Event) -> StoreResult<()>;

    /// Remove a stored event
    fn delete_event(&self, event: &Event) -> StoreResult<()>;
}

impl<S: EventStore + ?Sized> EventStore for Arc<S> {
    fn save_event(&self, event: Option<Arc<Event>>) -> StoreResult<()> {
        (**self).save_event(event)
    }

    fn query_events(&self, filter: &Filter) -> StoreResult<Vec<Arc<Event>>> {
        (**self).query_events(filter)
    }

    fn count_events(&self, filter: &Filter) -> StoreResult<usize> {
        (**self).count_events(filter)
    }

    fn replace_event(&self, event: &Event) -> StoreResult<()> {
        (**self).replace_event(event)
    }

    fn delete_event(&self, event: &Event) -> StoreResult<()> {
        (**self).delete_event(event)
    }
}
