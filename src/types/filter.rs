//! Query filter descriptors
//!
//! On the wire a filter is a JSON object whose tag constraints are
//! spelled as `"#<name>": [values]`. In memory they live in a plain map
//! keyed by the bare tag name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event::{Event, Kind, Timestamp};

/// A read-only query descriptor
///
/// Every dimension is optional. An empty dimension never constrains
/// a match, so `Filter::default()` matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter", into = "RawFilter")]
pub struct Filter {
    /// Event ids or id prefixes
    pub ids: Vec<String>,
    /// Author keys or key prefixes
    pub authors: Vec<String>,
    /// Accepted kinds
    pub kinds: Vec<Kind>,
    /// Inclusive lower time bound
    pub since: Option<Timestamp>,
    /// Inclusive upper time bound
    pub until: Option<Timestamp>,
    /// Tag name → accepted first values
    pub tags: BTreeMap<String, Vec<String>>,
    /// Maximum number of results (0 means no explicit limit)
    pub limit: Option<usize>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = Kind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    pub fn until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    /// Constrain a tag name to a set of values
    pub fn tag<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Explicit result limit, if any
    ///
    /// A zero limit is treated the same as no limit.
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|&limit| limit > 0)
    }

    /// Total number of tag values across all tag constraints
    pub fn tag_value_count(&self) -> usize {
        self.tags.values().map(Vec::len).sum()
    }

    /// Whether `event` satisfies every dimension of this filter
    pub fn matches(&self, event: &Event) -> bool {
        crate::store::matches(event, self)
    }
}

/// Error for a malformed filter object
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid filter: {0}")]
pub struct FilterError(String);

/// Wire representation of a filter
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    kinds: Vec<Kind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    since: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    until: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<usize>,
    /// `#<name>` tag constraints plus any keys we do not understand
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl TryFrom<RawFilter> for Filter {
    type Error = FilterError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        let mut tags = BTreeMap::new();

        for (key, value) in raw.extra {
            let Some(name) = key.strip_prefix('#') else {
                continue;
            };

            let values = serde_json::from_value::<Vec<String>>(value)
                .map_err(|_| FilterError(format!("{} must be an array of strings", key)))?;
            tags.insert(name.to_string(), values);
        }

        Ok(Self {
            ids: raw.ids,
            authors: raw.authors,
            kinds: raw.kinds,
            since: raw.since,
            until: raw.until,
            tags,
            limit: raw.limit,
        })
    }
}

impl From<Filter> for RawFilter {
    fn from(filter: Filter) -> Self {
        let extra = filter
            .tags
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| (format!("#{}", name), Value::from(values)))
            .collect();

        Self {
            ids: filter.ids,
            authors: filter.authors,
            kinds: filter.kinds,
            since: filter.since,
            until: filter.until,
            limit: filter.limit,
            extra,
        }
    }
}
