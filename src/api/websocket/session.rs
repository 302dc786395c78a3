//! Per-connection protocol state
//!
//! A `Session` owns the subscriptions opened over one WebSocket and turns
//! each client frame into the relay frames to send back. It holds no
//! socket, so the whole protocol can be driven from tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::messages::{ClientMessage, RelayMessage};
use super::state::AppState;
use crate::store::{StoreError, StoreResult};
use crate::types::{Event, Filter};

/// Subscriptions and limits for one connection
#[derive(Debug)]
pub struct Session {
    subscriptions: HashMap<String, Vec<Filter>>,
    max_subscriptions: usize,
}

impl Session {
    pub fn new(max_subscriptions: usize) -> Self {
        Self {
            subscriptions: HashMap::new(),
            max_subscriptions,
        }
    }

    /// Number of open subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Process one text frame and return the replies, in send order
    pub fn handle_text(&mut self, state: &AppState, text: &str) -> Vec<RelayMessage> {
        match ClientMessage::parse(text) {
            Ok(ClientMessage::Event(event)) => vec![self.handle_event(state, event)],
            Ok(ClientMessage::Req {
                subscription_id,
                filters,
            }) => self.handle_req(state, subscription_id, filters),
            Ok(ClientMessage::Close(subscription_id)) => {
                self.subscriptions.remove(&subscription_id);
                Vec::new()
            }
            Ok(ClientMessage::Count {
                subscription_id,
                filters,
            }) => vec![self.handle_count(state, subscription_id, &filters)],
            Err(e) => vec![RelayMessage::notice(format!("invalid: {}", e))],
        }
    }

    /// EVENT frames for every subscription a live event matches
    pub fn live_matches(&self, event: &Arc<Event>) -> Vec<RelayMessage> {
        self.subscriptions
            .iter()
            .filter(|(_, filters)| filters.iter().any(|f| f.matches(event)))
            .map(|(subscription_id, _)| RelayMessage::Event {
                subscription_id: subscription_id.clone(),
                event: Arc::clone(event),
            })
            .collect()
    }

    fn handle_event(&self, state: &AppState, event: Option<Event>) -> RelayMessage {
        let Some(event) = event else {
            // Let the store report the missing payload
            let reason = state.store().save_event(None).err();
            return RelayMessage::notice(format!(
                "invalid: {}",
                reason.map_or_else(String::new, |e| e.to_string())
            ));
        };

        if let Err(rejection) = state.event_policies.evaluate(&event) {
            return RelayMessage::ok(&event.id, false, format!("blocked: {}", rejection));
        }

        let event = Arc::new(event);
        match store_event(state, &event) {
            Ok(()) => {
                state.publish(Arc::clone(&event));
                RelayMessage::ok(&event.id, true, "")
            }
            Err(e) => RelayMessage::ok(&event.id, false, format!("error: {}", e)),
        }
    }

    fn handle_req(
        &mut self,
        state: &AppState,
        subscription_id: String,
        filters: Vec<Filter>,
    ) -> Vec<RelayMessage> {
        if let Some(rejection) = filters
            .iter()
            .find_map(|f| state.filter_policies.evaluate(f).err())
        {
            return vec![RelayMessage::closed(
                subscription_id,
                format!("blocked: {}", rejection),
            )];
        }

        if !self.subscriptions.contains_key(&subscription_id)
            && self.subscriptions.len() >= self.max_subscriptions
        {
            return vec![RelayMessage::closed(
                subscription_id,
                "error: too many subscriptions",
            )];
        }

        let events = match query_all(state, &filters) {
            Ok(events) => events,
            Err(e) => {
                return vec![RelayMessage::closed(subscription_id, format!("error: {}", e))]
            }
        };

        let mut replies: Vec<RelayMessage> = events
            .into_iter()
            .map(|event| RelayMessage::Event {
                subscription_id: subscription_id.clone(),
                event,
            })
            .collect();
        replies.push(RelayMessage::Eose(subscription_id.clone()));

        self.subscriptions.insert(subscription_id, filters);
        replies
    }

    fn handle_count(
        &self,
        state: &AppState,
        subscription_id: String,
        filters: &[Filter],
    ) -> RelayMessage {
        if let Some(rejection) = filters
            .iter()
            .find_map(|f| state.filter_policies.evaluate(f).err())
        {
            return RelayMessage::closed(subscription_id, format!("blocked: {}", rejection));
        }

        let count = match filters {
            [filter] => state.store().count_events(filter),
            _ => query_all(state, filters).map(|events| events.len()),
        };

        match count {
            Ok(count) => RelayMessage::Count {
                subscription_id,
                count,
            },
            Err(e) => RelayMessage::closed(subscription_id, format!("error: {}", e)),
        }
    }
}

/// Save an accepted event, replacing in place where the store supports it
fn store_event(state: &AppState, event: &Arc<Event>) -> StoreResult<()> {
    let store = state.store();

    if event.is_replaceable() || event.is_addressable() {
        match store.replace_event(event) {
            Err(StoreError::Unsupported(_)) => {}
            other => return other,
        }
    }

    store.save_event(Some(Arc::clone(event)))
}

/// Run every filter in turn, dropping events already returned
fn query_all(state: &AppState, filters: &[Filter]) -> StoreResult<Vec<Arc<Event>>> {
    let mut seen = HashSet::new();
    let mut events = Vec::new();

    for filter in filters {
        for event in state.store().query_events(filter)? {
            if seen.insert(event.id.clone()) {
                events.push(event);
            }
        }
    }

    Ok(events)
}
