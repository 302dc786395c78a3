//! Delivery adapters
//!
//! The store answers queries with a complete `Vec`. Hosting frameworks
//! often want a channel or a stream instead; these adapters bridge the
//! two shapes without changing the query semantics.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;

use crate::store::{EventStore, StoreResult};
use crate::types::{Event, Filter};

/// Run a query and hand back its results through a channel
///
/// The channel is sized to hold the whole result and the sending side is
/// already dropped, so the receiver yields every event and then `None`.
/// Query errors surface before any channel is created.
pub fn query_channel<S>(store: &S, filter: &Filter) -> StoreResult<mpsc::Receiver<Arc<Event>>>
where
    S: EventStore + ?Sized,
{
    let events = store.query_events(filter)?;
    let (tx, rx) = mpsc::channel(events.len().max(1));

    for event in events {
        // Capacity covers every event and the receiver is still alive
        let _ = tx.try_send(event);
    }

    Ok(rx)
}

/// Run a query and hand back its results as a stream
pub fn query_stream<S>(
    store: &S,
    filter: &Filter,
) -> StoreResult<impl Stream<Item = Arc<Event>> + Send + 'static>
where
    S: EventStore + ?Sized,
{
    let events = store.query_events(filter)?;

    Ok(async_stream::stream! {
        for event in events {
            yield event;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EventWindow, StoreError};
    use futures::StreamExt;
    use std::num::NonZeroUsize;

    fn filled_window() -> EventWindow {
        let window = EventWindow::new(NonZeroUsize::new(3).unwrap());
        for (id, kind) in [("a", 1), ("b", 7), ("c", 1), ("d", 1)] {
            window.insert(Arc::new(Event::new(id, "pk", 0, kind, "")));
        }
        window
    }

    struct FailingStore;

    impl EventStore for FailingStore {
        fn save_event(&self, _event: Option<Arc<Event>>) -> StoreResult<()> {
            Err(StoreError::Unsupported("save_event"))
        }

        fn query_events(&self, _filter: &Filter) -> StoreResult<Vec<Arc<Event>>> {
            Err(StoreError::Unsupported("query_events"))
        }

        fn replace_event(&self, _event: &Event) -> StoreResult<()> {
            Err(StoreError::Unsupported("replace_event"))
        }

        fn delete_event(&self, _event: &Event) -> StoreResult<()> {
            Err(StoreError::Unsupported("delete_event"))
        }
    }

    #[tokio::test]
    async fn test_query_channel_delivers_then_closes() {
        let window = filled_window();
        let mut rx = query_channel(&window, &Filter::new().kinds([1])).unwrap();

        let mut ids = Vec::new();
        while let Some(event) = rx.recv().await {
            ids.push(event.id.clone());
        }
        assert_eq!(ids, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_query_channel_empty_result() {
        let window = filled_window();
        let mut rx = query_channel(&window, &Filter::new().kinds([42])).unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_query_stream_preserves_order() {
        let window = filled_window();
        let events: Vec<Arc<Event>> = query_stream(&window, &Filter::default())
            .unwrap()
            .collect()
            .await;

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_query_errors_surface_immediately() {
        let err = query_channel(&FailingStore, &Filter::default()).unwrap_err();
        assert_eq!(err, StoreError::Unsupported("query_events"));
        assert!(query_stream(&FailingStore, &Filter::default()).is_err());
    }
}
