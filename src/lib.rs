//! Layered configuration for services and command-line tools.
//!
//! Sources (JSON or YAML buffers and files, environment variables, typed
//! defaults, explicit overrides) are merged into one flat map of dotted keys,
//! which can be read back flat, as a tree, or decoded into a typed struct.

pub mod cli;
pub mod decode;
pub mod error;
pub mod flatten;
pub mod key;
pub mod source;
pub mod store;

pub use decode::{DecodeError, Decoder, Hook, Target, duration_hook};
pub use error::{ConfigError, Result};
pub use flatten::{FlatMap, Tree, flatten, unflatten};
pub use source::{BufferSource, EnvSource, FileSource, Format, OverrideSource, Source, StructSource};
pub use store::Config;
