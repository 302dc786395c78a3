//! Bounded event window - fixed-capacity ring of recent events
//!
//! The window keeps the most recent `capacity` events. Writers claim a
//! slot by bumping a single monotonic cursor, then swap the slot's
//! contents; once the ring is full every insert evicts the oldest event.
//!
//! # Concurrency
//!
//! ```text
//!  cursor (monotonic)           occupancy (saturating at C)
//!       │                               │
//!       ▼                               ▼
//! ┌───┬───┬───┬───┬───┐   tail = cursor - occupancy
//! │ B │ C │ D │ E │ F │   walk tail → cursor-1 (mod C)
//! └───┴───┴───┴───┴───┘
//! ```
//!
//! - Inserts agree on one total order through `fetch_add` on the cursor.
//! - Each slot is an atomically swapped pointer; inserts and snapshots
//!   never wait on each other.
//! - A snapshot taken while writers are active may miss a just-claimed
//!   slot or see a slot that was overwritten mid-walk. Snapshots taken
//!   after writers finish are exact.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::error::{StoreError, StoreResult};
use super::matcher::matches;
use super::stats::WindowStats;
use super::EventStore;
use crate::types::{Event, Filter};

type Slot = ArcSwapOption<Event>;

/// Fixed-capacity, overwrite-oldest event store
pub struct EventWindow {
    slots: Box<[Slot]>,
    /// Total number of slot claims ever made
    cursor: AtomicU64,
    /// Number of occupied slots, never above capacity
    occupancy: AtomicUsize,
}

impl EventWindow {
    /// Create an empty window holding at most `capacity` events
    pub fn new(capacity: NonZeroUsize) -> Self {
        let slots: Vec<Slot> = (0..capacity.get()).map(|_| ArcSwapOption::empty()).collect();

        Self {
            slots: slots.into_boxed_slice(),
            cursor: AtomicU64::new(0),
            occupancy: AtomicUsize::new(0),
        }
    }

    /// Maximum number of events held at once
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current number of stored events
    pub fn len(&self) -> usize {
        self.occupancy.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `event`, evicting the oldest event when full
    ///
    /// Returns the slot index that now holds the event.
    pub fn insert(&self, event: Arc<Event>) -> usize {
        let position = self.cursor.fetch_add(1, Ordering::AcqRel);
        let index = self.slot_index(position);

        self.slots[index].store(Some(event));

        let capacity = self.capacity();
        let _ = self
            .occupancy
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < capacity).then_some(n + 1)
            });

        index
    }

    /// Events matching `filter`, oldest first
    ///
    /// The walk stops once the filter's limit is reached; without a limit
    /// it is bounded by the current occupancy.
    pub fn snapshot(&self, filter: &Filter) -> Vec<Arc<Event>> {
        let head = self.cursor.load(Ordering::Acquire);
        let count = self.len().min(self.capacity());

        if count == 0 {
            return Vec::new();
        }

        let limit = filter.effective_limit().map_or(count, |limit| limit.min(count));
        // Claims not yet reflected in occupancy must not push the tail past
        // stored events, so walk every claimed position still in the ring
        let span = head.min(self.capacity() as u64);
        let tail = head - span;
        let mut result = Vec::with_capacity(limit);

        for position in tail..head {
            let Some(event) = self.slots[self.slot_index(position)].load_full() else {
                continue;
            };

            if matches(&event, filter) {
                result.push(event);
                if result.len() >= limit {
                    break;
                }
            }
        }

        result
    }

    /// Number of events matching `filter`
    pub fn count(&self, filter: &Filter) -> usize {
        self.snapshot(filter).len()
    }

    /// Point-in-time counters for monitoring
    pub fn stats(&self) -> WindowStats {
        let total_inserted = self.cursor.load(Ordering::Acquire);
        let occupancy = self.len();

        WindowStats {
            capacity: self.capacity(),
            occupancy,
            total_inserted,
            evicted: total_inserted.saturating_sub(occupancy as u64),
        }
    }

    fn slot_index(&self, position: u64) -> usize {
        (position % self.slots.len() as u64) as usize
    }
}

impl std::fmt::Debug for EventWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWindow")
            .field("capacity", &self.capacity())
            .field("occupancy", &self.len())
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

impl EventStore for EventWindow {
    fn save_event(&self, event: Option<Arc<Event>>) -> StoreResult<()> {
        let event = event.ok_or_else(|| StoreError::invalid_input("event cannot be absent"))?;
        self.insert(event);
        Ok(())
    }

    fn query_events(&self, filter: &Filter) -> StoreResult<Vec<Arc<Event>>> {
        Ok(self.snapshot(filter))
    }

    fn count_events(&self, filter: &Filter) -> StoreResult<usize> {
        Ok(self.count(filter))
    }

    /// Ring slots are not indexed by id, so there is nothing to replace
    fn replace_event(&self, _event: &Event) -> StoreResult<()> {
        Err(StoreError::Unsupported("replace_event"))
    }

    /// Events leave the window only through eviction
    fn delete_event(&self, _event: &Event) -> StoreResult<()> {
        Err(StoreError::Unsupported("delete_event"))
    }
}
