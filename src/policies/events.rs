//! Event policies

use std::time::Duration;

use super::{PolicyResult, Rejection};
use crate::types::{Event, Kind, Timestamp};
use crate::utils::current_timestamp;

/// Reject any event whose kind is not in `kinds`
pub fn restrict_to_kinds(kinds: &[Kind]) -> impl Fn(&Event) -> PolicyResult + Send + Sync {
    let mut kinds = kinds.to_vec();
    kinds.sort_unstable();
    kinds.dedup();

    move |event: &Event| {
        if kinds.binary_search(&event.kind).is_ok() {
            return Ok(());
        }
        Err(Rejection::new(format!(
            "received event kind {} not allowed",
            event.kind
        )))
    }
}

/// Accept or refuse whole kind ranges
///
/// Addressable kinds are not covered by any flag and always pass.
pub fn restrict_to_kind_ranges(
    allow_ephemeral: bool,
    allow_regular: bool,
    allow_replaceable: bool,
) -> impl Fn(&Event) -> PolicyResult + Send + Sync {
    move |event: &Event| {
        if event.is_ephemeral() && !allow_ephemeral {
            return Err(Rejection::new("ephemeral events are not allowed"));
        }
        if event.is_regular() && !allow_regular {
            return Err(Rejection::new("regular events are not allowed"));
        }
        if event.is_replaceable() && !allow_replaceable {
            return Err(Rejection::new("replaceable events are not allowed"));
        }
        Ok(())
    }
}

/// Reject events created more than `threshold` ago
pub fn prevent_timestamps_in_the_past(
    threshold: Duration,
) -> impl Fn(&Event) -> PolicyResult + Send + Sync {
    let threshold = threshold_secs(threshold);
    move |event: &Event| {
        if current_timestamp().saturating_sub(event.created_at) > threshold {
            return Err(Rejection::new("event too old"));
        }
        Ok(())
    }
}

/// Reject events dated more than `threshold` ahead of now
pub fn prevent_timestamps_in_the_future(
    threshold: Duration,
) -> impl Fn(&Event) -> PolicyResult + Send + Sync {
    let threshold = threshold_secs(threshold);
    move |event: &Event| {
        if event.created_at.saturating_sub(current_timestamp()) > threshold {
            return Err(Rejection::new("event too much in the future"));
        }
        Ok(())
    }
}

/// Reject events embedding base64 images or videos in their content
pub fn reject_base64_media(event: &Event) -> PolicyResult {
    if event.content.contains("data:image/") || event.content.contains("data:video/") {
        return Err(Rejection::new("event with base64 media"));
    }
    Ok(())
}

fn threshold_secs(threshold: Duration) -> Timestamp {
    Timestamp::try_from(threshold.as_secs()).unwrap_or(Timestamp::MAX)
}
