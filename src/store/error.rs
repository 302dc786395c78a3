//! Error types for store operations

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations
///
/// A query that matches nothing is not an error; it returns an empty
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The caller handed over something that cannot be stored
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation is not offered by this storage shape
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl StoreError {
    /// Create a new InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::invalid_input("event cannot be absent");
        assert_eq!(err.to_string(), "invalid input: event cannot be absent");

        let err = StoreError::Unsupported("replace_event");
        assert_eq!(err.to_string(), "operation not supported: replace_event");
        assert!(err.is_unsupported());
    }
}
