//! Ephemeral Relay
//!
//! A publish/subscribe relay for short-lived events, backed by a bounded
//! in-memory window that keeps only the most recent events.
//!
//! # Features
//!
//! - **Bounded**: fixed capacity, the oldest event is overwritten when full
//! - **Lock-free cursor**: concurrent inserts agree on order through one atomic
//! - **Filter matching**: ids, authors, kinds, time bounds, and tag values
//! - **Policies**: composable accept/reject checks for events and filters
//! - **Relay wiring**: WebSocket protocol plus a small REST surface
//!
//! # Modules
//!
//! - `types`: Event and filter data structures
//! - `store`: The `EventStore` contract, the `EventWindow` ring, and matching
//! - `policies`: Event and filter policy pipelines
//! - `adapters`: Channel and stream delivery of query results
//! - `config`: Environment-driven relay configuration
//! - `api`: Axum router, WebSocket sessions, REST endpoints
//! - `utils`: Utility functions (timestamps, etc.)
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use ephemeral_relay::{Event, EventStore, EventWindow, Filter};
//!
//! let window = EventWindow::new(NonZeroUsize::new(2).unwrap());
//! for id in ["a", "b", "c"] {
//!     window.save_event(Some(Arc::new(Event::new(id, "pk", 0, 1, "")))).unwrap();
//! }
//!
//! let events = window.query_events(&Filter::new().kinds([1])).unwrap();
//! let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
//! assert_eq!(ids, ["b", "c"]);
//! ```

pub mod adapters;
pub mod api;
pub mod config;
pub mod policies;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{ConfigError, RelayConfig};
pub use policies::{EventPipeline, FilterPipeline, Policy, PolicyResult, Rejection};
pub use store::{matches, EventStore, EventWindow, StoreError, StoreResult, WindowStats};
pub use types::{AppResult, Event, Filter, FilterError, Kind, Timestamp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
