//! Conversion between nested trees and flat dotted-key maps.
//!
//! Every source contributes a [`FlatMap`]; the store merges them key by key,
//! and rebuilds a [`Tree`] only when a hierarchical view or a typed decode is
//! asked for. Arrays are leaves: they are replaced entirely, never merged
//! element by element.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::key;

/// Dotted key to leaf value, in insertion order.
pub type FlatMap = IndexMap<String, Value>;

/// Nested mapping of segment to subtree or leaf.
pub type Tree = serde_json::Map<String, Value>;

/// Flatten a tree into dotted keys.
///
/// Objects are walked depth first; every other value is emitted under the
/// joined path that leads to it. An empty object has no leaves and so
/// disappears from the output.
///
/// # Errors
///
/// Fails with [`ConfigError::InvalidKey`](crate::ConfigError::InvalidKey) if a
/// segment is empty or contains the joiner, since the resulting key could not
/// be split back into the same path.
///
/// # Example
/// ```
/// use serde_json::json;
/// use strata_config::flatten::flatten;
///
/// let tree = json!({"server": {"port": 8080, "hosts": ["a", "b"]}});
/// let flat = flatten(tree.as_object().unwrap().clone()).unwrap();
/// assert_eq!(flat["server.port"], json!(8080));
/// assert_eq!(flat["server.hosts"], json!(["a", "b"]));
/// ```
pub fn flatten(tree: Tree) -> Result<FlatMap> {
    let mut flat = FlatMap::new();
    let mut path = Vec::new();
    flatten_into(tree, &mut path, &mut flat)?;
    Ok(flat)
}

fn flatten_into(tree: Tree, path: &mut Vec<String>, flat: &mut FlatMap) -> Result<()> {
    for (segment, value) in tree {
        key::validate_segment(&segment)?;
        path.push(segment);
        match value {
            Value::Object(child) => flatten_into(child, path, flat)?,
            leaf => {
                flat.insert(key::join(path), leaf);
            }
        }
        path.pop();
    }
    Ok(())
}

/// Rebuild a tree from dotted keys.
///
/// Intermediate objects are created on demand. When one key is a strict
/// prefix path of another (`a` and `a.b`), the nested keys win and the leaf
/// at `a` is dropped, whichever of the two comes first in the map.
///
/// # Example
/// ```
/// use serde_json::json;
/// use strata_config::flatten::{FlatMap, unflatten};
///
/// let mut flat = FlatMap::new();
/// flat.insert("server.port".into(), json!(8080));
/// flat.insert("server.host".into(), json!("localhost"));
/// let tree = unflatten(&flat);
/// assert_eq!(
///     serde_json::Value::Object(tree),
///     json!({"server": {"port": 8080, "host": "localhost"}})
/// );
/// ```
pub fn unflatten(flat: &FlatMap) -> Tree {
    let mut root = Tree::new();
    for (flat_key, value) in flat {
        let segments = key::split(flat_key);
        let Some((last, parents)) = segments.split_last() else {
            continue;
        };

        let mut node = &mut root;
        for segment in parents {
            node = ensure_branch(node, segment, flat_key);
        }

        if matches!(node.get(*last), Some(Value::Object(_))) {
            debug!(key = %flat_key, "leaf value shadowed by nested keys");
            continue;
        }
        node.insert((*last).to_string(), value.clone());
    }
    root
}

fn ensure_branch<'t>(node: &'t mut Tree, segment: &str, flat_key: &str) -> &'t mut Tree {
    let child = node
        .entry(segment)
        .or_insert_with(|| Value::Object(Tree::new()));
    if !child.is_object() {
        debug!(key = %flat_key, segment, "leaf value replaced by nested keys");
        *child = Value::Object(Tree::new());
    }
    match child {
        Value::Object(map) => map,
        _ => unreachable!("branch was just made an object"),
    }
}

/// Merge `overlay` into `base`, with `overlay` taking precedence key by key.
///
/// Keys already in `base` keep their position; new keys are appended.
pub fn merge(mut base: FlatMap, overlay: FlatMap) -> FlatMap {
    base.extend(overlay);
    base
}
