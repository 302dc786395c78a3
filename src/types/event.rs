//! Event types for the relay
//!
//! An event is an immutable, signed record published by a client.
//! The relay never mutates an event once accepted; it only stores,
//! matches, and forwards it.

use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds
pub type Timestamp = i64;

/// Small integer classifying an event
pub type Kind = u16;

/// Canonical length of an event id or author key, in hex characters
pub const ID_HEX_LEN: usize = 64;

/// An immutable event as it travels over the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Hex digest identifying the event
    pub id: String,

    /// Hex key of the author
    pub pubkey: String,

    /// Creation time claimed by the author
    pub created_at: Timestamp,

    /// Event kind
    pub kind: Kind,

    /// Ordered tag list; the first element of each tag is its name
    #[serde(default)]
    pub tags: Vec<Vec<String>>,

    /// Event body
    #[serde(default)]
    pub content: String,

    /// Author signature, relayed verbatim
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sig: String,
}

impl Event {
    /// Create a new event without tags or signature
    pub fn new(
        id: impl Into<String>,
        pubkey: impl Into<String>,
        created_at: Timestamp,
        kind: Kind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            pubkey: pubkey.into(),
            created_at,
            kind,
            tags: Vec::new(),
            content: content.into(),
            sig: String::new(),
        }
    }

    /// Append a tag
    pub fn with_tag<I, S>(mut self, tag: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.push(tag.into_iter().map(Into::into).collect());
        self
    }

    /// Values of every tag named `name`
    ///
    /// Only the first value (second element) of each tag is yielded,
    /// which is the one filters match against.
    pub fn tag_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.len() > 1 && tag[0] == name)
            .map(|tag| tag[1].as_str())
    }

    /// Whether this event's kind is regular (stored as-is)
    pub fn is_regular(&self) -> bool {
        is_regular_kind(self.kind)
    }

    /// Whether this event's kind is replaceable (latest per author wins)
    pub fn is_replaceable(&self) -> bool {
        is_replaceable_kind(self.kind)
    }

    /// Whether this event's kind is ephemeral (never meant to be persisted)
    pub fn is_ephemeral(&self) -> bool {
        is_ephemeral_kind(self.kind)
    }

    /// Whether this event's kind is addressable (latest per author and `d` tag wins)
    pub fn is_addressable(&self) -> bool {
        is_addressable_kind(self.kind)
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event {} (kind {}, author {}, at {})",
            self.id, self.kind, self.pubkey, self.created_at
        )
    }
}

pub fn is_regular_kind(kind: Kind) -> bool {
    kind < 10000 && kind != 0 && kind != 3
}

pub fn is_replaceable_kind(kind: Kind) -> bool {
    kind == 0 || kind == 3 || (10000..20000).contains(&kind)
}

pub fn is_ephemeral_kind(kind: Kind) -> bool {
    (20000..30000).contains(&kind)
}

pub fn is_addressable_kind(kind: Kind) -> bool {
    (30000..40000).contains(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserialization() {
        let value = json!({
            "id": "a".repeat(64),
            "pubkey": "b".repeat(64),
            "created_at": 1704067200,
            "kind": 1,
            "tags": [["e", "abc"], ["p", "xyz", "wss://relay.example"]],
            "content": "hello",
            "sig": "c".repeat(128)
        });

        let event: Event = serde_json::from_value(value).unwrap();
        assert_eq!(event.kind, 1);
        assert_eq!(event.created_at, 1704067200);
        assert_eq!(event.tags.len(), 2);
        assert_eq!(event.content, "hello");
        assert_eq!(event.sig.len(), 128);
    }

    #[test]
    fn test_event_missing_optional_fields() {
        let value = json!({
            "id": "a",
            "pubkey": "b",
            "created_at": 1,
            "kind": 7
        });

        let event: Event = serde_json::from_value(value).unwrap();
        assert!(event.tags.is_empty());
        assert!(event.content.is_empty());

        // Empty signature is not written back
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("sig"));
    }

    #[test]
    fn test_tag_values() {
        let event = Event::new("id", "pk", 0, 1, "")
            .with_tag(["e", "abc"])
            .with_tag(["p", "xyz"])
            .with_tag(["e", "def", "wss://relay.example"])
            .with_tag(["e"]);

        let values: Vec<&str> = event.tag_values("e").collect();
        assert_eq!(values, vec!["abc", "def"]);
        assert_eq!(event.tag_values("t").count(), 0);
    }

    #[test]
    fn test_kind_classification() {
        assert!(is_regular_kind(1));
        assert!(!is_regular_kind(0));
        assert!(!is_regular_kind(3));
        assert!(is_replaceable_kind(0));
        assert!(is_replaceable_kind(3));
        assert!(is_replaceable_kind(10002));
        assert!(is_ephemeral_kind(20001));
        assert!(!is_ephemeral_kind(30000));
        assert!(is_addressable_kind(30023));
    }
}
