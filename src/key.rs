//! Dotted key paths.
//!
//! A flat key such as `server.http.port` is the segments `server`, `http`,
//! `port` joined by [`JOINER`]. There is no escape syntax: a segment can never
//! contain the joiner itself.

use crate::error::{ConfigError, Result};

/// Separator between key path segments.
pub const JOINER: char = '.';

/// Join segments into a flat key.
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    let mut key = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            key.push(JOINER);
        }
        key.push_str(segment.as_ref());
    }
    key
}

/// Split a flat key on every joiner.
pub fn split(key: &str) -> Vec<&str> {
    key.split(JOINER).collect()
}

/// Check that `key` is a usable flat key: non-empty, with no empty segment.
pub fn validate(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ConfigError::invalid_key(key, "key is empty"));
    }
    if key.split(JOINER).any(str::is_empty) {
        return Err(ConfigError::invalid_key(key, "key has an empty segment"));
    }
    Ok(())
}

/// Check a single segment coming from a tree node.
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(ConfigError::invalid_key(segment, "segment is empty"));
    }
    if segment.contains(JOINER) {
        return Err(ConfigError::invalid_key(
            segment,
            format!("segment contains the '{JOINER}' joiner"),
        ));
    }
    Ok(())
}

/// Place `key` under `prefix`. An empty prefix leaves the key as is.
pub fn prefixed(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{JOINER}{key}")
    }
}

/// Remainder of `key` below `prefix`, or `None` if `key` is not under it.
///
/// `strip("a", "a.b.c")` is `Some("b.c")`; `strip("a", "ab.c")` and
/// `strip("a", "a")` are both `None`.
pub fn strip<'k>(prefix: &str, key: &'k str) -> Option<&'k str> {
    key.strip_prefix(prefix)?.strip_prefix(JOINER)
}
