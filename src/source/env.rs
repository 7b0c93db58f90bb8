//! Process environment variables.
//!
//! `MY_SERVER_PORT=8080` becomes the key `my.server.port`: names are
//! lower-cased and every underscore becomes the key joiner. Values always stay
//! strings; the decoder coerces them into the target field types.

use serde_json::Value;
use std::ffi::OsString;
use tracing::debug;

use super::Source;
use crate::error::Result;
use crate::flatten::{FlatMap, merge};
use crate::key;

/// Environment variables, optionally scoped by a key prefix.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
    vars: Option<Vec<(OsString, OsString)>>,
}

impl EnvSource {
    /// Import every environment variable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Import only variables under `prefix`, with the prefix removed.
    ///
    /// With prefix `"my"`, `MY_S_VALUE=hello` becomes `s.value = "hello"` and
    /// `OTHER_S_VALUE` is ignored. An empty prefix imports everything.
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = to_key(prefix);
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
            vars: None,
        }
    }

    /// Read from the given pairs instead of the process environment.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn snapshot(&self) -> Vec<(OsString, OsString)> {
        let mut vars = match &self.vars {
            Some(vars) => vars.clone(),
            None => std::env::vars_os().collect(),
        };
        vars.sort();
        vars
    }

    fn entries(&self) -> FlatMap {
        let mut entries = FlatMap::new();
        for (name, value) in self.snapshot() {
            let (Some(name), Some(value)) = (name.to_str(), value.to_str()) else {
                debug!(var = ?name, "skipping non-unicode environment variable");
                continue;
            };

            let candidate = to_key(name);
            let flat_key = match &self.prefix {
                Some(prefix) => match key::strip(prefix, &candidate) {
                    Some(rest) => rest.to_string(),
                    None => continue,
                },
                None => candidate,
            };

            if let Err(e) = key::validate(&flat_key) {
                debug!(var = name, error = %e, "skipping environment variable");
                continue;
            }
            entries.insert(flat_key, Value::String(value.to_string()));
        }
        entries
    }
}

fn to_key(name: &str) -> String {
    name.to_lowercase().replace('_', &key::JOINER.to_string())
}

impl Source for EnvSource {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        let entries = self.entries();
        debug!(prefix = ?self.prefix, keys = entries.len(), "applying environment source");
        Ok(merge(flat, entries))
    }
}
