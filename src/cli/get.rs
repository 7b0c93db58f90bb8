//! Get subcommand for strata CLI
//!
//! Prints a single key. A key that names a branch prints the whole subtree.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use super::dump::{OutputFormat, serialize};
use crate::Config;

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key to look up (e.g. server.port)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Output format for branches and non-string leaves
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

/// Look up `args.key`; plain strings are printed without quoting.
///
/// Nested keys shadow a leaf at the same path, as in the tree view.
pub fn render(config: &Config, args: &GetArgs) -> Result<String> {
    let branch = config.scoped(&args.key);
    if !branch.is_empty() {
        return serialize(&Value::Object(branch.to_tree()), args.format);
    }

    match config.get(&args.key) {
        Some(Value::String(s)) => Ok(format!("{s}\n")),
        Some(other) => serialize(other, args.format),
        None => bail!("key not found: {}", args.key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OverrideSource;

    fn sample() -> Config {
        Config::new()
            .with_source(
                OverrideSource::new()
                    .set("server.port", 80)
                    .set("server.host", "localhost"),
            )
            .unwrap()
    }

    fn args(key: &str) -> GetArgs {
        GetArgs {
            key: key.to_string(),
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_string_leaf_is_raw() {
        assert_eq!(render(&sample(), &args("server.host")).unwrap(), "localhost\n");
    }

    #[test]
    fn test_number_leaf() {
        assert_eq!(render(&sample(), &args("server.port")).unwrap().trim(), "80");
    }

    #[test]
    fn test_branch_prints_subtree() {
        let out = render(&sample(), &args("server")).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"port": 80, "host": "localhost"}));
    }

    #[test]
    fn test_branch_shadows_leaf() {
        let config = Config::new()
            .with_source(OverrideSource::new().set("a", "leaf").set("a.b", 1))
            .unwrap();
        let out = render(&config, &args("a")).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!({"b": 1}));
        assert_eq!(Value::Object(config.to_tree())["a"], parsed);
    }

    #[test]
    fn test_missing_key() {
        let err = render(&sample(), &args("client")).unwrap_err();
        assert!(err.to_string().contains("client"));
    }
}
