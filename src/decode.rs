//! Binding merged trees onto typed targets.
//!
//! Values coming from the environment or from `--set` overrides are always
//! strings, whatever the target field expects. [`Decoder`] sits between the
//! tree and the target's `Deserialize` impl and reshapes each value for the
//! kind of data the target asks for:
//!
//! 1. hooks, in order, where the first one that returns `Some` wins;
//! 2. the weak coercion table (`"true"` to `bool`, `"42"` to integers, a
//!    scalar to a one-element sequence, and so on);
//! 3. plain structural assignment.
//!
//! The default decoder carries [`duration_hook`], so `std::time::Duration`
//! fields accept strings like `"1m"` or `"250ms"`, and plain numbers as
//! seconds.
//!
//! Map keys go through the same steps as values, so a `HashMap<u16, _>` can
//! be read from string keys. Struct fields are matched by their serialized
//! name first and then without regard to case.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, EnumAccess, IntoDeserializer,
    VariantAccess, Visitor,
    value::{MapDeserializer, SeqDeserializer, StringDeserializer},
};
use serde_json::{Number, Value, json};
use std::fmt;
use std::time::Duration;

use crate::flatten::Tree;
use crate::key;

/// Failure to bind a value onto the target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    path: Option<String>,
    message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            path: None,
            message: message.into(),
        }
    }

    /// Dotted path of the value that failed, when known.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    // Keeps the innermost path.
    fn at(mut self, path: &str) -> Self {
        if self.path.is_none() && !path.is_empty() {
            self.path = Some(path.to_string());
        }
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "cannot decode {path}: {}", self.message),
            None => write!(f, "cannot decode: {}", self.message),
        }
    }
}

impl std::error::Error for DecodeError {}

impl de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }
}

fn from_json(err: serde_json::Error) -> DecodeError {
    DecodeError::new(err.to_string())
}

/// Kind of data the target type asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Bool,
    Signed,
    Unsigned,
    Float,
    Str,
    /// `std::time::Duration`.
    Duration,
    Seq,
    Map,
    Struct,
}

/// A conversion tried before the built-in coercions.
///
/// Returning `None` leaves the value as it is for the next step.
pub type Hook = fn(Target, &Value) -> Option<Result<Value, DecodeError>>;

/// Parse strings such as `"1m"`, `"1h 30m"` or `"250ms"` into durations.
///
/// A number is read as seconds; fractions are kept down to the nanosecond.
pub fn duration_hook(target: Target, value: &Value) -> Option<Result<Value, DecodeError>> {
    if target != Target::Duration {
        return None;
    }
    let parsed = match value {
        Value::String(text) => humantime::parse_duration(text.trim())
            .map_err(|e| DecodeError::new(format!("invalid duration {text:?}: {e}"))),
        Value::Number(n) => seconds(n),
        _ => return None,
    };
    Some(parsed.map(|d| json!({"secs": d.as_secs(), "nanos": d.subsec_nanos()})))
}

fn seconds(n: &Number) -> Result<Duration, DecodeError> {
    if let Some(secs) = n.as_u64() {
        return Ok(Duration::from_secs(secs));
    }
    n.as_f64()
        .and_then(|f| Duration::try_from_secs_f64(f).ok())
        .ok_or_else(|| DecodeError::new(format!("invalid duration {n}: expected seconds >= 0")))
}

/// Typed decoding of a merged tree.
#[derive(Debug, Clone)]
pub struct Decoder {
    hooks: Vec<Hook>,
    weakly_typed: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Weakly typed decoder with the duration hook.
    pub fn new() -> Self {
        Self {
            hooks: vec![duration_hook],
            weakly_typed: true,
        }
    }

    /// Append a hook after the ones already registered.
    #[must_use]
    pub fn with_hook(mut self, hook: Hook) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Drop every hook, including the duration hook.
    #[must_use]
    pub fn without_hooks(mut self) -> Self {
        self.hooks.clear();
        self
    }

    /// Turn the weak coercion table on or off.
    #[must_use]
    pub fn weakly_typed(mut self, enabled: bool) -> Self {
        self.weakly_typed = enabled;
        self
    }

    /// Bind `tree` onto `T`.
    pub fn decode<T: DeserializeOwned>(&self, tree: Tree) -> Result<T, DecodeError> {
        T::deserialize(Weak {
            decoder: self,
            value: Value::Object(tree),
            path: String::new(),
        })
    }

    fn coerce(&self, target: Target, value: Value, path: &str) -> Result<Value, DecodeError> {
        for hook in &self.hooks {
            if let Some(result) = hook(target, &value) {
                return result.map_err(|e| e.at(path));
            }
        }
        if self.weakly_typed
            && let Some(coerced) = weak(target, &value)
        {
            return Ok(coerced);
        }
        Ok(value)
    }
}

fn weak(target: Target, value: &Value) -> Option<Value> {
    match (target, value) {
        (Target::Bool, Value::String(s)) => parse_bool(s).map(Value::Bool),
        (Target::Bool, Value::Number(n)) => {
            Some(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)))
        }
        (Target::Signed | Target::Unsigned | Target::Float, Value::Bool(b)) => {
            Some(Value::from(u8::from(*b)))
        }
        (Target::Signed, Value::String(s)) => {
            parse_integer(s, |t| t.parse::<i64>().ok().map(Value::from))
        }
        (Target::Unsigned, Value::String(s)) => {
            parse_integer(s, |t| t.parse::<u64>().ok().map(Value::from))
        }
        (Target::Signed | Target::Unsigned, Value::Number(n)) if n.is_f64() => whole(n.as_f64()?),
        (Target::Float, Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(Value::from(0.0));
            }
            s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number)
        }
        (Target::Str, Value::Number(n)) => Some(Value::String(n.to_string())),
        (Target::Str, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (Target::Seq, Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
            Some(Value::Array(vec![value.clone()]))
        }
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "" | "0" => Some(false),
        "1" => Some(true),
        // YAML 1.1 spellings, which serde_yaml leaves as strings.
        s if ["true", "t", "yes", "y", "on"]
            .iter()
            .any(|w| s.eq_ignore_ascii_case(w)) =>
        {
            Some(true)
        }
        s if ["false", "f", "no", "n", "off"]
            .iter()
            .any(|w| s.eq_ignore_ascii_case(w)) =>
        {
            Some(false)
        }
        _ => None,
    }
}

fn parse_integer(s: &str, parse: impl Fn(&str) -> Option<Value>) -> Option<Value> {
    let s = s.trim();
    if s.is_empty() {
        return Some(Value::from(0));
    }
    parse(s).or_else(|| whole(s.parse::<f64>().ok()?))
}

// A float with no fractional part, as an integer.
fn whole(f: f64) -> Option<Value> {
    if f.fract() != 0.0 || !f.is_finite() {
        return None;
    }
    if f < 0.0 {
        (f >= i64::MIN as f64).then(|| Value::from(f as i64))
    } else {
        (f <= u64::MAX as f64).then(|| Value::from(f as u64))
    }
}

// Serialized field or variant name for `key`, matched exactly and then
// without regard to case.
fn match_name(names: &[&str], key: String) -> String {
    if names.contains(&key.as_str()) {
        return key;
    }
    names
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&key))
        .map_or(key, |name| (*name).to_string())
}

fn is_duration(name: &str, fields: &[&str]) -> bool {
    name == "Duration" && fields == ["secs", "nanos"]
}

/// Deserializer over one value of the tree.
struct Weak<'d> {
    decoder: &'d Decoder,
    value: Value,
    path: String,
}

impl<'d> Weak<'d> {
    fn child(decoder: &'d Decoder, parent: &str, segment: &str, value: Value) -> Self {
        Self {
            decoder,
            value,
            path: key::prefixed(parent, segment),
        }
    }
}

fn visit_map<'de, V: Visitor<'de>>(
    decoder: &Decoder,
    path: &str,
    map: Tree,
    names: Option<&[&str]>,
    visitor: V,
) -> Result<V::Value, DecodeError> {
    let entries = map.into_iter().map(|(k, v)| {
        let k = match names {
            Some(names) => match_name(names, k),
            None => k,
        };
        let child = Weak::child(decoder, path, &k, v);
        let key = Weak {
            decoder,
            path: child.path.clone(),
            value: Value::String(k),
        };
        (key, child)
    });
    let mut access: MapDeserializer<'de, _, DecodeError> = MapDeserializer::new(entries);
    let value = visitor.visit_map(&mut access)?;
    access.end()?;
    Ok(value)
}

fn visit_seq<'de, V: Visitor<'de>>(
    decoder: &Decoder,
    path: &str,
    items: Vec<Value>,
    visitor: V,
) -> Result<V::Value, DecodeError> {
    let items = items.into_iter().enumerate().map(|(i, value)| Weak {
        decoder,
        value,
        path: format!("{path}[{i}]"),
    });
    let mut access: SeqDeserializer<_, DecodeError> = SeqDeserializer::new(items);
    let value = visitor.visit_seq(&mut access)?;
    access.end()?;
    Ok(value)
}

impl<'de> IntoDeserializer<'de, DecodeError> for Weak<'_> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

macro_rules! weak_scalar {
    ($($method:ident => $target:expr),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
                let value = self.decoder.coerce($target, self.value, &self.path)?;
                value
                    .$method(visitor)
                    .map_err(|e| from_json(e).at(&self.path))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Weak<'_> {
    type Error = DecodeError;

    weak_scalar! {
        deserialize_bool => Target::Bool,
        deserialize_i8 => Target::Signed,
        deserialize_i16 => Target::Signed,
        deserialize_i32 => Target::Signed,
        deserialize_i64 => Target::Signed,
        deserialize_u8 => Target::Unsigned,
        deserialize_u16 => Target::Unsigned,
        deserialize_u32 => Target::Unsigned,
        deserialize_u64 => Target::Unsigned,
        deserialize_f32 => Target::Float,
        deserialize_f64 => Target::Float,
        deserialize_char => Target::Str,
        deserialize_str => Target::Str,
        deserialize_string => Target::Str,
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let Weak {
            decoder,
            value,
            path,
        } = self;
        let result = match value {
            Value::Object(map) => visit_map(decoder, &path, map, None, visitor),
            Value::Array(items) => visit_seq(decoder, &path, items, visitor),
            scalar => scalar.deserialize_any(visitor).map_err(from_json),
        };
        result.map_err(|e| e.at(&path))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let Weak {
            decoder,
            value,
            path,
        } = self;
        let result = match decoder.coerce(Target::Seq, value, &path)? {
            Value::Array(items) => visit_seq(decoder, &path, items, visitor),
            other => other.deserialize_seq(visitor).map_err(from_json),
        };
        result.map_err(|e| e.at(&path))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        let Weak {
            decoder,
            value,
            path,
        } = self;
        let result = match decoder.coerce(Target::Map, value, &path)? {
            Value::Object(map) => visit_map(decoder, &path, map, None, visitor),
            other => other.deserialize_map(visitor).map_err(from_json),
        };
        result.map_err(|e| e.at(&path))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let target = if is_duration(name, fields) {
            Target::Duration
        } else {
            Target::Struct
        };
        let Weak {
            decoder,
            value,
            path,
        } = self;
        let result = match decoder.coerce(target, value, &path)? {
            Value::Object(map) => visit_map(decoder, &path, map, Some(fields), visitor),
            Value::Array(items) => visit_seq(decoder, &path, items, visitor),
            other => other
                .deserialize_struct(name, fields, visitor)
                .map_err(from_json),
        };
        result.map_err(|e| e.at(&path))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        let Weak {
            decoder,
            value,
            path,
        } = self;
        let result = match value {
            Value::String(variant) => visitor.visit_enum(StringDeserializer::<DecodeError>::new(
                match_name(variants, variant),
            )),
            Value::Object(map) if map.len() == 1 => {
                let mut entries = map.into_iter();
                match entries.next() {
                    Some((variant, content)) => {
                        let variant = match_name(variants, variant);
                        let content = Weak::child(decoder, &path, &variant, content);
                        visitor.visit_enum(WeakEnum { variant, content })
                    }
                    None => Err(DecodeError::new("expected a single enum variant")),
                }
            }
            other => other
                .deserialize_enum(name, variants, visitor)
                .map_err(from_json),
        };
        result.map_err(|e| e.at(&path))
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.value
            .deserialize_bytes(visitor)
            .map_err(|e| from_json(e).at(&self.path))
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.value
            .deserialize_byte_buf(visitor)
            .map_err(|e| from_json(e).at(&self.path))
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.value
            .deserialize_unit(visitor)
            .map_err(|e| from_json(e).at(&self.path))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_unit(visitor)
    }

    // Field and variant names skip hooks and coercion.
    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        self.value
            .deserialize_identifier(visitor)
            .map_err(|e| from_json(e).at(&self.path))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DecodeError> {
        visitor.visit_unit()
    }
}

struct WeakEnum<'d> {
    variant: String,
    content: Weak<'d>,
}

impl<'de, 'd> EnumAccess<'de> for WeakEnum<'d> {
    type Error = DecodeError;
    type Variant = Weak<'d>;

    fn variant_seed<S: DeserializeSeed<'de>>(
        self,
        seed: S,
    ) -> Result<(S::Value, Weak<'d>), DecodeError> {
        let variant = seed.deserialize(StringDeserializer::<DecodeError>::new(self.variant))?;
        Ok((variant, self.content))
    }
}

impl<'de> VariantAccess<'de> for Weak<'_> {
    type Error = DecodeError;

    fn unit_variant(self) -> Result<(), DecodeError> {
        match self.value {
            Value::Null => Ok(()),
            other => Err(
                DecodeError::new(format!("expected a unit variant, found {other}")).at(&self.path),
            ),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, DecodeError> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DecodeError> {
        self.deserialize_struct("", fields, visitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;
    use std::time::Duration;

    fn tree(value: Value) -> Tree {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[derive(Debug, Deserialize, PartialEq, Default)]
    #[serde(default)]
    struct Scalars {
        b: bool,
        i: i32,
        u: u16,
        f: f32,
        s: String,
        d: Duration,
        a: Vec<String>,
    }

    #[test]
    fn test_strings_coerce_to_field_types() {
        let decoded: Scalars = Decoder::new()
            .decode(tree(json!({
                "b": "true", "i": "-42", "u": "42", "f": "3.5", "s": 7, "d": "1m", "a": "one"
            })))
            .unwrap();
        assert_eq!(
            decoded,
            Scalars {
                b: true,
                i: -42,
                u: 42,
                f: 3.5,
                s: "7".into(),
                d: Duration::from_secs(60),
                a: vec!["one".into()],
            }
        );
    }

    #[test]
    fn test_native_types_pass_through() {
        let decoded: Scalars = Decoder::new()
            .decode(tree(json!({"b": false, "i": 5, "a": ["x", "y"]})))
            .unwrap();
        assert!(!decoded.b);
        assert_eq!(decoded.i, 5);
        assert_eq!(decoded.a, vec!["x", "y"]);
    }

    #[test]
    fn test_bool_spellings() {
        let cases = [
            ("1", true),
            ("T", true),
            ("TRUE", true),
            ("0", false),
            ("f", false),
            ("", false),
        ];
        for (text, expected) in cases {
            let decoded: Scalars = Decoder::new().decode(tree(json!({"b": text}))).unwrap();
            assert_eq!(decoded.b, expected, "{text:?}");
        }
    }

    #[test]
    fn test_numbers_to_bool_and_back() {
        let decoded: Scalars = Decoder::new()
            .decode(tree(json!({"b": 2, "i": true, "f": false})))
            .unwrap();
        assert!(decoded.b);
        assert_eq!(decoded.i, 1);
        assert_eq!(decoded.f, 0.0);
    }

    #[test]
    fn test_whole_float_to_integer() {
        let decoded: Scalars = Decoder::new()
            .decode(tree(json!({"i": 4.0, "u": "8.0"})))
            .unwrap();
        assert_eq!(decoded.i, 4);
        assert_eq!(decoded.u, 8);
    }

    #[test]
    fn test_yaml_1_1_bool_spellings() {
        for (text, expected) in [("yes", true), ("On", true), ("Y", true), ("no", false), ("OFF", false)] {
            let decoded: Scalars = Decoder::new().decode(tree(json!({"b": text}))).unwrap();
            assert_eq!(decoded.b, expected, "{text:?}");
        }
        let err = Decoder::new()
            .decode::<Scalars>(tree(json!({"b": "maybe"})))
            .unwrap_err();
        assert_eq!(err.path(), Some("b"));
    }

    #[test]
    fn test_numeric_duration_is_seconds() {
        let decoded: Scalars = Decoder::new().decode(tree(json!({"d": 30}))).unwrap();
        assert_eq!(decoded.d, Duration::from_secs(30));

        let decoded: Scalars = Decoder::new().decode(tree(json!({"d": 1.5}))).unwrap();
        assert_eq!(decoded.d, Duration::from_millis(1500));

        let err = Decoder::new()
            .decode::<Scalars>(tree(json!({"d": -1})))
            .unwrap_err();
        assert_eq!(err.path(), Some("d"));
    }

    #[test]
    fn test_map_keys_are_coerced() {
        #[derive(Debug, Deserialize)]
        struct Root {
            m: HashMap<String, HashMap<u16, String>>,
            flags: HashMap<bool, u8>,
        }
        let decoded: Root = Decoder::new()
            .decode(tree(json!({
                "m": {"ports": {"1": "a", "8080": "b"}},
                "flags": {"true": "1", "off": 0}
            })))
            .unwrap();
        assert_eq!(decoded.m["ports"][&1], "a");
        assert_eq!(decoded.m["ports"][&8080], "b");
        assert_eq!(decoded.flags[&true], 1);
        assert_eq!(decoded.flags[&false], 0);
    }

    #[test]
    fn test_bad_map_key_reports_path() {
        let err = Decoder::new()
            .decode::<HashMap<String, HashMap<u16, String>>>(tree(json!({"m": {"x": "a"}})))
            .unwrap_err();
        assert_eq!(err.path(), Some("m.x"));
    }

    #[test]
    fn test_strict_decoder_rejects_strings() {
        let err = Decoder::new()
            .weakly_typed(false)
            .decode::<Scalars>(tree(json!({"i": "42"})))
            .unwrap_err();
        assert_eq!(err.path(), Some("i"));
    }

    #[test]
    fn test_bad_duration_reports_path() {
        #[derive(Debug, Deserialize)]
        struct Outer {
            #[allow(dead_code)]
            inner: Scalars,
        }
        let err = Decoder::new()
            .decode::<Outer>(tree(json!({"inner": {"d": "soon"}})))
            .unwrap_err();
        assert_eq!(err.path(), Some("inner.d"));
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_without_hooks_duration_string_fails() {
        let result = Decoder::new()
            .without_hooks()
            .decode::<Scalars>(tree(json!({"d": "1m"})));
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_hook_runs_before_coercion() {
        fn upper(target: Target, value: &Value) -> Option<Result<Value, DecodeError>> {
            match (target, value) {
                (Target::Str, Value::String(s)) => Some(Ok(Value::String(s.to_uppercase()))),
                _ => None,
            }
        }
        let decoded: Scalars = Decoder::new()
            .with_hook(upper)
            .decode(tree(json!({"s": "loud"})))
            .unwrap();
        assert_eq!(decoded.s, "LOUD");
    }

    #[test]
    fn test_field_names_match_without_case() {
        #[derive(Debug, Deserialize)]
        struct Named {
            #[serde(rename = "maxConn")]
            max_conn: u32,
            host: String,
        }
        let decoded: Named = Decoder::new()
            .decode(tree(json!({"maxconn": "10", "HOST": "example"})))
            .unwrap();
        assert_eq!(decoded.max_conn, 10);
        assert_eq!(decoded.host, "example");
    }

    #[test]
    fn test_nested_maps_and_options() {
        #[derive(Debug, Deserialize)]
        struct Value1 {
            port: Option<u16>,
            tags: Option<HashMap<String, String>>,
        }
        #[derive(Debug, Deserialize)]
        struct Root {
            values: HashMap<String, Value1>,
        }
        let decoded: Root = Decoder::new()
            .decode(tree(json!({"values": {"v1": {"port": "80", "tags": {"k1": "v1"}}, "v2": {}}})))
            .unwrap();
        assert_eq!(decoded.values["v1"].port, Some(80));
        assert_eq!(decoded.values["v1"].tags.as_ref().unwrap()["k1"], "v1");
        assert_eq!(decoded.values["v2"].port, None);
    }

    #[test]
    fn test_enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "lowercase")]
        enum Mode {
            Fast,
            Limited { rate: u32 },
        }
        #[derive(Debug, Deserialize)]
        struct Root {
            a: Mode,
            b: Mode,
        }
        let decoded: Root = Decoder::new()
            .decode(tree(json!({"a": "FAST", "b": {"limited": {"rate": "5"}}})))
            .unwrap();
        assert_eq!(decoded.a, Mode::Fast);
        assert_eq!(decoded.b, Mode::Limited { rate: 5 });
    }

    #[test]
    fn test_untyped_targets_keep_values() {
        let decoded: HashMap<String, Value> = Decoder::new()
            .decode(tree(json!({"a": "1", "b": {"c": [1, 2]}})))
            .unwrap();
        assert_eq!(decoded["a"], json!("1"));
        assert_eq!(decoded["b"], json!({"c": [1, 2]}));
    }

    #[test]
    fn test_missing_field_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Required {
            port: u16,
        }
        let err = Decoder::new().decode::<Required>(Tree::new()).unwrap_err();
        assert!(err.to_string().contains("port"));
    }
}
