//! Accept/reject policies
//!
//! Policies run before the store is touched: event policies gate
//! `save_event`, filter policies gate queries. A `Pipeline` is an ordered
//! list of policies evaluated as a left fold that stops at the first
//! rejection.
//!
//! ```ignore
//! let pipeline = EventPipeline::new()
//!     .with(restrict_to_kinds(&[1, 30023]))
//!     .with(reject_base64_media);
//! pipeline.evaluate(&event)?;
//! ```

mod adapters;
mod events;
mod filters;

use thiserror::Error;

use crate::types::{Event, Filter};

pub use adapters::verdict;
pub use events::{
    prevent_timestamps_in_the_future, prevent_timestamps_in_the_past, reject_base64_media,
    restrict_to_kind_ranges, restrict_to_kinds,
};
pub use filters::{no_complex_filters, no_empty_filters};

/// Reason a policy refused an event or filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Rejection(String);

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Outcome of a policy check
pub type PolicyResult = Result<(), Rejection>;

/// A single accept/reject predicate over `T`
pub trait Policy<T: ?Sized>: Send + Sync {
    fn evaluate(&self, subject: &T) -> PolicyResult;
}

impl<T: ?Sized, F> Policy<T> for F
where
    F: Fn(&T) -> PolicyResult + Send + Sync,
{
    fn evaluate(&self, subject: &T) -> PolicyResult {
        self(subject)
    }
}

/// Ordered chain of policies
pub struct Pipeline<T: ?Sized> {
    policies: Vec<Box<dyn Policy<T>>>,
}

/// Policies applied to inbound events
pub type EventPipeline = Pipeline<Event>;

/// Policies applied to subscription filters
pub type FilterPipeline = Pipeline<Filter>;

impl<T: ?Sized> Pipeline<T> {
    /// Create an empty pipeline, which accepts everything
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    /// Append a policy (builder style)
    pub fn with(mut self, policy: impl Policy<T> + 'static) -> Self {
        self.push(policy);
        self
    }

    /// Append a policy
    pub fn push(&mut self, policy: impl Policy<T> + 'static) {
        self.policies.push(Box::new(policy));
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Run every policy in order, stopping at the first rejection
    pub fn evaluate(&self, subject: &T) -> PolicyResult {
        self.policies
            .iter()
            .try_for_each(|policy| policy.evaluate(subject))
    }

    /// `(rejected, reason)` form of `evaluate`
    pub fn verdict(&self, subject: &T) -> (bool, String) {
        verdict(self.evaluate(subject))
    }
}

impl<T: ?Sized> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("policies", &self.policies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event(kind: u16) -> Event {
        Event::new("id", "pk", 0, kind, "")
    }

    #[test]
    fn test_empty_pipeline_accepts() {
        let pipeline = EventPipeline::new();
        assert!(pipeline.is_empty());
        assert!(pipeline.evaluate(&event(1)).is_ok());
    }

    #[test]
    fn test_first_rejection_wins() {
        let pipeline = EventPipeline::new()
            .with(|_: &Event| -> PolicyResult { Err(Rejection::new("first")) })
            .with(|_: &Event| -> PolicyResult { Err(Rejection::new("second")) });

        let err = pipeline.evaluate(&event(1)).unwrap_err();
        assert_eq!(err.reason(), "first");
    }

    #[test]
    fn test_short_circuits_after_rejection() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let pipeline = EventPipeline::new()
            .with(|e: &Event| -> PolicyResult {
                if e.kind == 7 {
                    Err(Rejection::new("no reactions"))
                } else {
                    Ok(())
                }
            })
            .with(move |_: &Event| -> PolicyResult {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        assert!(pipeline.evaluate(&event(1)).is_ok());
        assert!(pipeline.evaluate(&event(7)).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pipeline_verdict() {
        let pipeline = FilterPipeline::new().with(no_empty_filters);

        let (rejected, reason) = pipeline.verdict(&Filter::default());
        assert!(rejected);
        assert_eq!(reason, "can't handle empty filters");

        let (rejected, reason) = pipeline.verdict(&Filter::new().kinds([1]));
        assert!(!rejected);
        assert!(reason.is_empty());
    }
}
