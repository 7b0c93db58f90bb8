//! In-memory JSON and YAML payloads.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::Source;
use crate::error::{ConfigError, Result};
use crate::flatten::{FlatMap, Tree, flatten, merge};

/// Text formats a buffer can be read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Resolve a format tag or file extension, ignoring case.
    ///
    /// `json` and `js` read as JSON, `yaml` and `yml` as YAML.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.to_lowercase().as_str() {
            "json" | "js" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(tag.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Parse `bytes` into a tree.
    ///
    /// Both formats decode into `serde_json::Value`, so YAML scalars get the
    /// same number and boolean typing as JSON ones. An empty YAML document is
    /// an empty tree. Any top level other than a mapping is rejected.
    pub fn parse(&self, bytes: &[u8]) -> Result<Tree> {
        let value: Value = match self {
            Format::Json => {
                serde_json::from_slice(bytes).map_err(|e| ConfigError::parse(self, e))?
            }
            Format::Yaml => {
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Tree::new());
                }
                serde_yaml::from_slice(bytes).map_err(|e| ConfigError::parse(self, e))?
            }
        };

        match value {
            Value::Object(tree) => Ok(tree),
            Value::Null => Ok(Tree::new()),
            other => Err(ConfigError::parse(
                self,
                format!("top level must be a mapping, found {}", kind(&other)),
            )),
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Format::from_tag(s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

/// A JSON or YAML payload held in memory.
///
/// The format tag is resolved when the source is applied, so an unknown tag
/// surfaces from [`Config::add_source`](crate::Config::add_source) like any
/// other source error.
#[derive(Debug, Clone)]
pub struct BufferSource {
    bytes: Vec<u8>,
    tag: String,
}

impl BufferSource {
    /// Create a source from a payload and a format tag such as `"yaml"`.
    pub fn new(bytes: impl Into<Vec<u8>>, tag: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            tag: tag.into(),
        }
    }

    /// Create a source with an already resolved format.
    pub fn with_format(bytes: impl Into<Vec<u8>>, format: Format) -> Self {
        Self::new(bytes, format.as_str())
    }

    /// Parse and flatten the payload without merging it anywhere.
    pub(crate) fn entries(&self) -> Result<FlatMap> {
        let format = Format::from_tag(&self.tag)?;
        flatten(format.parse(&self.bytes)?)
    }
}

impl Source for BufferSource {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        let entries = self.entries()?;
        debug!(format = %self.tag, keys = entries.len(), "applying buffer source");
        Ok(merge(flat, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_tags() {
        assert_eq!(Format::from_tag("json").unwrap(), Format::Json);
        assert_eq!(Format::from_tag("JS").unwrap(), Format::Json);
        assert_eq!(Format::from_tag("Yaml").unwrap(), Format::Yaml);
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_tag("toml"),
            Err(ConfigError::UnsupportedFormat(tag)) if tag == "toml"
        ));
    }

    #[test]
    fn test_json_buffer() {
        let source = BufferSource::new(r#"{"a": {"b": 1, "c": [true]}}"#, "json");
        let flat = source.overlay(FlatMap::new()).unwrap();
        assert_eq!(flat["a.b"], json!(1));
        assert_eq!(flat["a.c"], json!([true]));
    }

    #[test]
    fn test_yaml_typing_matches_json() {
        let yaml = BufferSource::new("a:\n  b: 1\n  t: true\n  f: 3.5\n  s: hi\n", "yml")
            .overlay(FlatMap::new())
            .unwrap();
        let json = BufferSource::new(r#"{"a":{"b":1,"t":true,"f":3.5,"s":"hi"}}"#, "json")
            .overlay(FlatMap::new())
            .unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn test_empty_yaml_is_empty() {
        let flat = BufferSource::new("  \n", "yaml")
            .overlay(FlatMap::new())
            .unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = BufferSource::new("{not json", "json")
            .overlay(FlatMap::new())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref format, .. } if format == "json"));
    }

    #[test]
    fn test_non_mapping_top_level() {
        let err = BufferSource::new("- a\n- b\n", "yaml")
            .overlay(FlatMap::new())
            .unwrap_err();
        assert!(err.to_string().contains("top level must be a mapping"));
    }

    #[test]
    fn test_unknown_tag_leaves_input_untouched() {
        let mut base = FlatMap::new();
        base.insert("keep".into(), json!(1));
        let err = BufferSource::new("{}", "ini").overlay(base).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_overlay_keeps_existing_keys() {
        let mut base = FlatMap::new();
        base.insert("a.b".into(), json!(0));
        base.insert("z".into(), json!("kept"));
        let flat = BufferSource::with_format("a:\n  b: 5\n", Format::Yaml)
            .overlay(base)
            .unwrap();
        assert_eq!(flat["a.b"], json!(5));
        assert_eq!(flat["z"], json!("kept"));
    }
}
