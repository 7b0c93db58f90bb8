//! The configuration store.
//!
//! [`Config`] owns one flat map and grows it source by source. Sources added
//! later override earlier ones key by key, so the usual layering is simply
//! the order of the calls:
//!
//! 1. defaults ([`StructSource`](crate::StructSource))
//! 2. files ([`FileSource`](crate::FileSource))
//! 3. environment ([`EnvSource`](crate::EnvSource))
//! 4. explicit overrides ([`OverrideSource`](crate::OverrideSource))

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::decode::Decoder;
use crate::error::Result;
use crate::flatten::{FlatMap, Tree, unflatten};
use crate::key;
use crate::source::Source;

/// Merged configuration from any number of sources.
///
/// # Example
/// ```
/// use serde::Deserialize;
/// use std::time::Duration;
/// use strata_config::{BufferSource, Config, EnvSource};
///
/// #[derive(Deserialize)]
/// struct Server {
///     port: u16,
///     timeout: Duration,
/// }
///
/// let mut config = Config::new();
/// config
///     .add_source(&BufferSource::new("server:\n  port: 80\n  timeout: 30s\n", "yaml"))
///     .unwrap();
/// config
///     .add_source(&EnvSource::with_prefix("app").with_vars([("APP_SERVER_PORT", "8080")]))
///     .unwrap();
///
/// let server: Server = config.decode("server").unwrap();
/// assert_eq!(server.port, 8080);
/// assert_eq!(server.timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    flat: FlatMap,
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay `source` over the current entries.
    ///
    /// On error the configuration is left exactly as it was.
    pub fn add_source<S: Source + ?Sized>(&mut self, source: &S) -> Result<()> {
        let flat = source.overlay(self.flat.clone())?;
        debug!(
            source = ?source,
            before = self.flat.len(),
            after = flat.len(),
            "source applied"
        );
        self.flat = flat;
        Ok(())
    }

    /// Builder form of [`add_source`](Self::add_source).
    pub fn with_source<S: Source>(mut self, source: S) -> Result<Self> {
        self.add_source(&source)?;
        Ok(self)
    }

    /// A copy of the flat entries.
    pub fn flat_map(&self) -> FlatMap {
        self.flat.clone()
    }

    /// Value stored under a flat key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.flat.get(key)
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    /// The entries as a nested tree.
    pub fn to_tree(&self) -> Tree {
        unflatten(&self.flat)
    }

    /// Decode the entries under `prefix` into `T`.
    ///
    /// With an empty prefix the whole configuration is decoded. Otherwise
    /// only keys under `prefix.` are used, with the prefix removed, so `T`
    /// does not need to know where it lives.
    pub fn decode<T: DeserializeOwned>(&self, prefix: &str) -> Result<T> {
        self.decode_with(&Decoder::default(), prefix)
    }

    /// Like [`decode`](Self::decode), with a caller-supplied decoder.
    pub fn decode_with<T: DeserializeOwned>(&self, decoder: &Decoder, prefix: &str) -> Result<T> {
        let tree = if prefix.is_empty() {
            self.to_tree()
        } else {
            self.scoped(prefix).to_tree()
        };
        Ok(decoder.decode(tree)?)
    }

    /// A new configuration holding only the keys under `prefix.`, with the
    /// prefix removed.
    pub fn scoped(&self, prefix: &str) -> Config {
        let flat = self
            .flat
            .iter()
            .filter_map(|(k, v)| key::strip(prefix, k).map(|rest| (rest.to_string(), v.clone())))
            .collect();
        Config { flat }
    }
}
