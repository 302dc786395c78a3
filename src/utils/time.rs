//! Time and timestamp utilities

use chrono::{TimeZone, Utc};

use crate::types::Timestamp;

/// Get current Unix timestamp in seconds
pub fn current_timestamp() -> Timestamp {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as RFC 3339, or `None` if it is out of range
pub fn format_timestamp(timestamp: Timestamp) -> Option<String> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2024-01-01T00:00:00Z
        assert!(current_timestamp() > 1704067200);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(1704067200).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(format_timestamp(i64::MAX), None);
    }
}
