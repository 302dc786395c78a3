//! Relay configuration
//!
//! Settings are read from environment variables once at startup. Every
//! variable is optional; unset variables fall back to `Default`.
//!
//! | Variable                       | Default          |
//! |--------------------------------|------------------|
//! | `RELAY_ADDR`                   | `127.0.0.1:3334` |
//! | `RELAY_CAPACITY`               | `1000`           |
//! | `RELAY_BROADCAST_CAPACITY`     | `1024`           |
//! | `RELAY_MAX_SUBSCRIPTIONS`      | `20`             |
//! | `RELAY_ALLOWED_KINDS`          | any kind         |
//! | `RELAY_MAX_EVENT_AGE_SECS`     | no check         |
//! | `RELAY_MAX_FUTURE_SECS`        | no check         |
//! | `RELAY_REJECT_BASE64_MEDIA`    | `false`          |
//! | `RELAY_REJECT_EMPTY_FILTERS`   | `true`           |
//! | `RELAY_REJECT_COMPLEX_FILTERS` | `false`          |

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::policies::{
    no_complex_filters, no_empty_filters, prevent_timestamps_in_the_future,
    prevent_timestamps_in_the_past, reject_base64_media, restrict_to_kinds, EventPipeline,
    FilterPipeline,
};
use crate::types::Kind;

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Address the listener binds to
    pub listen_addr: SocketAddr,
    /// Number of events the window holds
    pub capacity: NonZeroUsize,
    /// Live fan-out buffer; slower connections get a lag notice
    pub broadcast_capacity: usize,
    /// Open subscriptions allowed per connection
    pub max_subscriptions: usize,
    /// Accepted kinds, or `None` for any
    pub allowed_kinds: Option<Vec<Kind>>,
    /// Oldest accepted `created_at`, relative to now
    pub max_event_age: Option<Duration>,
    /// Furthest accepted `created_at` ahead of now
    pub max_future_drift: Option<Duration>,
    pub reject_base64_media: bool,
    pub reject_empty_filters: bool,
    pub reject_complex_filters: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3334)),
            capacity: NonZeroUsize::new(1000).unwrap_or(NonZeroUsize::MIN),
            broadcast_capacity: 1024,
            max_subscriptions: 20,
            allowed_kinds: None,
            max_event_age: None,
            max_future_drift: None,
            reject_base64_media: false,
            reject_empty_filters: true,
            reject_complex_filters: false,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(value) = get("RELAY_ADDR") {
            config.listen_addr = parse("RELAY_ADDR", &value)?;
        }
        if let Some(value) = get("RELAY_CAPACITY") {
            config.capacity = parse("RELAY_CAPACITY", &value)?;
        }
        if let Some(value) = get("RELAY_BROADCAST_CAPACITY") {
            config.broadcast_capacity = parse("RELAY_BROADCAST_CAPACITY", &value)?;
            if config.broadcast_capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    var: "RELAY_BROADCAST_CAPACITY",
                    value,
                    reason: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(value) = get("RELAY_MAX_SUBSCRIPTIONS") {
            config.max_subscriptions = parse("RELAY_MAX_SUBSCRIPTIONS", &value)?;
        }
        if let Some(value) = get("RELAY_ALLOWED_KINDS") {
            let kinds = value
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| parse::<Kind>("RELAY_ALLOWED_KINDS", k))
                .collect::<Result<Vec<_>, _>>()?;
            config.allowed_kinds = Some(kinds);
        }
        if let Some(value) = get("RELAY_MAX_EVENT_AGE_SECS") {
            let secs: u64 = parse("RELAY_MAX_EVENT_AGE_SECS", &value)?;
            config.max_event_age = Some(Duration::from_secs(secs));
        }
        if let Some(value) = get("RELAY_MAX_FUTURE_SECS") {
            let secs: u64 = parse("RELAY_MAX_FUTURE_SECS", &value)?;
            config.max_future_drift = Some(Duration::from_secs(secs));
        }
        if let Some(value) = get("RELAY_REJECT_BASE64_MEDIA") {
            config.reject_base64_media = parse_flag("RELAY_REJECT_BASE64_MEDIA", &value)?;
        }
        if let Some(value) = get("RELAY_REJECT_EMPTY_FILTERS") {
            config.reject_empty_filters = parse_flag("RELAY_REJECT_EMPTY_FILTERS", &value)?;
        }
        if let Some(value) = get("RELAY_REJECT_COMPLEX_FILTERS") {
            config.reject_complex_filters = parse_flag("RELAY_REJECT_COMPLEX_FILTERS", &value)?;
        }

        Ok(config)
    }

    /// Build the event policy chain described by this config
    pub fn event_pipeline(&self) -> EventPipeline {
        let mut pipeline = EventPipeline::new();

        if let Some(kinds) = &self.allowed_kinds {
            pipeline.push(restrict_to_kinds(kinds));
        }
        if let Some(age) = self.max_event_age {
            pipeline.push(prevent_timestamps_in_the_past(age));
        }
        if let Some(drift) = self.max_future_drift {
            pipeline.push(prevent_timestamps_in_the_future(drift));
        }
        if self.reject_base64_media {
            pipeline.push(reject_base64_media);
        }

        pipeline
    }

    /// Build the filter policy chain described by this config
    pub fn filter_pipeline(&self) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();

        if self.reject_empty_filters {
            pipeline.push(no_empty_filters);
        }
        if self.reject_complex_filters {
            pipeline.push(no_complex_filters);
        }

        pipeline
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RelayConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RelayConfig::default());
        assert_eq!(config.capacity.get(), 1000);
        assert!(config.reject_empty_filters);
    }

    #[test]
    fn test_reads_variables() {
        let config = RelayConfig::from_lookup(lookup(&[
            ("RELAY_ADDR", "0.0.0.0:7777"),
            ("RELAY_CAPACITY", "50"),
            ("RELAY_ALLOWED_KINDS", "1, 30023"),
            ("RELAY_MAX_EVENT_AGE_SECS", "3600"),
            ("RELAY_REJECT_BASE64_MEDIA", "yes"),
            ("RELAY_REJECT_EMPTY_FILTERS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.listen_addr.port(), 7777);
        assert_eq!(config.capacity.get(), 50);
        assert_eq!(config.allowed_kinds, Some(vec![1, 30023]));
        assert_eq!(config.max_event_age, Some(Duration::from_secs(3600)));
        assert!(config.reject_base64_media);
        assert!(!config.reject_empty_filters);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = RelayConfig::from_lookup(lookup(&[("RELAY_CAPACITY", "0")])).unwrap_err();
        let ConfigError::InvalidValue { var, .. } = err;
        assert_eq!(var, "RELAY_CAPACITY");
    }

    #[test]
    fn test_invalid_flag_names_variable() {
        let err =
            RelayConfig::from_lookup(lookup(&[("RELAY_REJECT_BASE64_MEDIA", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("RELAY_REJECT_BASE64_MEDIA"));
    }

    #[test]
    fn test_pipelines_follow_config() {
        let config = RelayConfig::default();
        assert!(config.event_pipeline().is_empty());
        assert_eq!(config.filter_pipeline().len(), 1);

        let config = RelayConfig {
            allowed_kinds: Some(vec![1]),
            reject_base64_media: true,
            reject_complex_filters: true,
            ..RelayConfig::default()
        };
        assert_eq!(config.event_pipeline().len(), 2);
        assert_eq!(config.filter_pipeline().len(), 2);
    }
}
