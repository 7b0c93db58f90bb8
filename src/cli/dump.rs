//! Dump subcommand for strata CLI
//!
//! Prints the merged configuration, either as flat dotted keys or as a
//! nested tree, in JSON or YAML.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::Value;

use crate::Config;

/// Arguments for the dump subcommand
#[derive(Args, Debug, Default)]
pub struct DumpArgs {
    /// Shape of the output
    #[arg(long, value_enum, default_value_t = View::Tree)]
    pub view: View,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Only print keys under this prefix, with the prefix removed
    #[arg(short, long, value_name = "KEY")]
    pub prefix: Option<String>,
}

/// Shape of the dumped configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// One entry per dotted key
    Flat,
    /// Nested mappings
    #[default]
    Tree,
}

/// Serialization used for output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

/// Serialize `value` in the chosen format.
pub fn serialize(value: &Value, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)? + "\n",
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Render the configuration as asked by `args`.
pub fn render(config: &Config, args: &DumpArgs) -> Result<String> {
    let scoped;
    let config = match args.prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => {
            scoped = config.scoped(prefix);
            &scoped
        }
        _ => config,
    };

    let value = match args.view {
        View::Flat => Value::Object(config.flat_map().into_iter().collect()),
        View::Tree => Value::Object(config.to_tree()),
    };
    serialize(&value, args.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OverrideSource;
    use serde_json::json;

    fn sample() -> Config {
        Config::new()
            .with_source(
                OverrideSource::new()
                    .set("server.port", 80)
                    .set("server.host", "localhost")
                    .set("debug", true),
            )
            .unwrap()
    }

    #[test]
    fn test_flat_json() {
        let args = DumpArgs {
            view: View::Flat,
            format: OutputFormat::Json,
            prefix: None,
        };
        let out: Value = serde_json::from_str(&render(&sample(), &args).unwrap()).unwrap();
        assert_eq!(
            out,
            json!({"server.port": 80, "server.host": "localhost", "debug": true})
        );
    }

    #[test]
    fn test_tree_yaml_with_prefix() {
        let args = DumpArgs {
            view: View::Tree,
            format: OutputFormat::Yaml,
            prefix: Some("server".into()),
        };
        let out = render(&sample(), &args).unwrap();
        let parsed: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"port": 80, "host": "localhost"}));
    }

    #[test]
    fn test_empty_config() {
        let out = render(&Config::new(), &DumpArgs::default()).unwrap();
        assert_eq!(out.trim(), "{}");
    }
}
