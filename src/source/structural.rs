//! Typed values used as configuration, typically defaults.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

use super::Source;
use crate::error::{ConfigError, Result};
use crate::flatten::{FlatMap, flatten, merge};
use crate::key;

/// Any `Serialize` value, flattened and optionally placed under a prefix.
///
/// Fields skipped by `#[serde(skip_serializing_if = ...)]` contribute no
/// keys, so a partially filled struct only overrides what it sets.
///
/// # Example
/// ```
/// use serde::Serialize;
/// use strata_config::{Config, StructSource};
///
/// #[derive(Serialize)]
/// struct Defaults {
///     port: u16,
/// }
///
/// let mut config = Config::new();
/// config
///     .add_source(&StructSource::with_prefix("server", Defaults { port: 8080 }))
///     .unwrap();
/// assert_eq!(config.get("server.port"), Some(&serde_json::json!(8080)));
/// ```
pub struct StructSource<T> {
    prefix: String,
    value: T,
}

impl<T: Serialize> StructSource<T> {
    pub fn new(value: T) -> Self {
        Self::with_prefix("", value)
    }

    pub fn with_prefix(prefix: impl Into<String>, value: T) -> Self {
        Self {
            prefix: prefix.into(),
            value,
        }
    }

    fn entries(&self) -> Result<FlatMap> {
        if !self.prefix.is_empty() {
            key::validate(&self.prefix)?;
        }

        let entries = match serde_json::to_value(&self.value)? {
            Value::Object(tree) => flatten(tree)?,
            Value::Null => FlatMap::new(),
            leaf if !self.prefix.is_empty() => {
                return Ok(FlatMap::from([(self.prefix.clone(), leaf)]));
            }
            _ => {
                return Err(ConfigError::parse(
                    "struct",
                    "a value that is not a mapping needs a key prefix",
                ));
            }
        };

        if self.prefix.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .map(|(k, v)| (key::prefixed(&self.prefix, &k), v))
            .collect())
    }
}

impl<T> fmt::Debug for StructSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSource")
            .field("prefix", &self.prefix)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Serialize> Source for StructSource<T> {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        let entries = self.entries()?;
        debug!(prefix = %self.prefix, keys = entries.len(), "applying struct source");
        Ok(merge(flat, entries))
    }
}
