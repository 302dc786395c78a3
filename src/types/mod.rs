//! Data types for the relay
//!
//! This module contains the event and filter structures shared by the
//! store, the policy layer, and the relay wiring.

mod event;
mod filter;

pub use event::{
    is_addressable_kind, is_ephemeral_kind, is_regular_kind, is_replaceable_kind, Event, Kind,
    Timestamp, ID_HEX_LEN,
};
pub use filter::{Filter, FilterError};

/// Result type for the binary and wiring layers
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
