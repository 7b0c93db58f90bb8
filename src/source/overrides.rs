//! Explicit key/value overrides, such as `--set server.port=9000`.

use serde_json::Value;
use tracing::debug;

use super::Source;
use crate::error::{ConfigError, Result};
use crate::flatten::{FlatMap, flatten, merge};
use crate::key;

/// Individual keys set by the caller, usually applied last.
#[derive(Debug, Clone, Default)]
pub struct OverrideSource {
    entries: Vec<(String, Value)>,
}

impl OverrideSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one override. Later calls for the same key win.
    ///
    /// An object value is spread into one entry per leaf below `key`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Build from `key=value` strings. Values are kept as strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for an item without `=`.
    pub fn parse_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidOverride(pair.to_string()))?;
            source = source.set(k.trim(), v);
        }
        Ok(source)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Source for OverrideSource {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        let mut entries = FlatMap::new();
        for (k, v) in &self.entries {
            key::validate(k)?;
            match v {
                Value::Object(tree) => {
                    for (sub, leaf) in flatten(tree.clone())? {
                        entries.insert(key::prefixed(k, &sub), leaf);
                    }
                }
                leaf => {
                    entries.insert(k.clone(), leaf.clone());
                }
            }
        }
        debug!(keys = entries.len(), "applying override source");
        Ok(merge(flat, entries))
    }
}
