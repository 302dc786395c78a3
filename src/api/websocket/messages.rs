//! Relay protocol frames
//!
//! Every frame is a JSON array whose first element names the message:
//!
//! ```text
//! client → relay   ["EVENT", event] ["REQ", id, filter...] ["CLOSE", id] ["COUNT", id, filter...]
//! relay → client   ["EVENT", id, event] ["OK", event_id, bool, msg] ["EOSE", id]
//!                  ["CLOSED", id, msg] ["NOTICE", msg] ["COUNT", id, {"count": n}]
//! ```

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::types::{Event, Filter};

/// Longest subscription id a client may choose
pub const MAX_SUBSCRIPTION_ID_LEN: usize = 64;

/// Errors raised while decoding a client frame
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty frame")]
    EmptyFrame,

    #[error("unknown message type {0:?}")]
    UnknownVerb(String),

    #[error("{0} requires a subscription id")]
    MissingSubscriptionId(&'static str),

    #[error("subscription id must be 1 to 64 characters")]
    InvalidSubscriptionId,

    #[error("{0} requires at least one filter")]
    MissingFilters(&'static str),

    #[error("bad event: {0}")]
    InvalidEvent(serde_json::Error),

    #[error("bad filter: {0}")]
    InvalidFilter(serde_json::Error),
}

/// A decoded client frame
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Publish an event; `None` when the frame carries no payload
    Event(Option<Event>),
    /// Open a subscription
    Req {
        subscription_id: String,
        filters: Vec<Filter>,
    },
    /// Close a subscription
    Close(String),
    /// Ask for the number of matching events
    Count {
        subscription_id: String,
        filters: Vec<Filter>,
    },
}

impl ClientMessage {
    /// Decode a text frame
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let frame: Vec<Value> = serde_json::from_str(text)?;
        let mut parts = frame.into_iter();

        let verb = match parts.next() {
            Some(Value::String(verb)) => verb,
            Some(other) => return Err(ProtocolError::UnknownVerb(other.to_string())),
            None => return Err(ProtocolError::EmptyFrame),
        };

        match verb.as_str() {
            "EVENT" => {
                let event = parts
                    .next()
                    .map(serde_json::from_value::<Event>)
                    .transpose()
                    .map_err(ProtocolError::InvalidEvent)?;
                Ok(Self::Event(event))
            }
            "REQ" => {
                let subscription_id = parse_subscription_id(parts.next(), "REQ")?;
                let filters = parse_filters(parts, "REQ")?;
                Ok(Self::Req {
                    subscription_id,
                    filters,
                })
            }
            "CLOSE" => Ok(Self::Close(parse_subscription_id(parts.next(), "CLOSE")?)),
            "COUNT" => {
                let subscription_id = parse_subscription_id(parts.next(), "COUNT")?;
                let filters = parse_filters(parts, "COUNT")?;
                Ok(Self::Count {
                    subscription_id,
                    filters,
                })
            }
            _ => Err(ProtocolError::UnknownVerb(verb)),
        }
    }
}

fn parse_subscription_id(value: Option<Value>, verb: &'static str) -> Result<String, ProtocolError> {
    match value {
        Some(Value::String(id)) if (1..=MAX_SUBSCRIPTION_ID_LEN).contains(&id.chars().count()) => {
            Ok(id)
        }
        Some(_) => Err(ProtocolError::InvalidSubscriptionId),
        None => Err(ProtocolError::MissingSubscriptionId(verb)),
    }
}

fn parse_filters(
    values: impl Iterator<Item = Value>,
    verb: &'static str,
) -> Result<Vec<Filter>, ProtocolError> {
    let filters = values
        .map(serde_json::from_value::<Filter>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ProtocolError::InvalidFilter)?;

    if filters.is_empty() {
        return Err(ProtocolError::MissingFilters(verb));
    }
    Ok(filters)
}

/// A frame sent from the relay to a client
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Event {
        subscription_id: String,
        event: Arc<Event>,
    },
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    Eose(String),
    Closed {
        subscription_id: String,
        message: String,
    },
    Notice(String),
    Count {
        subscription_id: String,
        count: usize,
    },
}

#[derive(Serialize)]
struct CountBody {
    count: usize,
}

impl RelayMessage {
    pub fn ok(event_id: impl Into<String>, accepted: bool, message: impl Into<String>) -> Self {
        Self::Ok {
            event_id: event_id.into(),
            accepted,
            message: message.into(),
        }
    }

    pub fn closed(subscription_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Closed {
            subscription_id: subscription_id.into(),
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice(message.into())
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Serialize for RelayMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Event {
                subscription_id,
                event,
            } => ("EVENT", subscription_id, event.as_ref()).serialize(serializer),
            Self::Ok {
                event_id,
                accepted,
                message,
            } => ("OK", event_id, accepted, message).serialize(serializer),
            Self::Eose(subscription_id) => ("EOSE", subscription_id).serialize(serializer),
            Self::Closed {
                subscription_id,
                message,
            } => ("CLOSED", subscription_id, message).serialize(serializer),
            Self::Notice(message) => ("NOTICE", message).serialize(serializer),
            Self::Count {
                subscription_id,
                count,
            } => ("COUNT", subscription_id, CountBody { count: *count }).serialize(serializer),
        }
    }
}
