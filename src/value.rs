use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::sync::Arc;

pub type Map = IndexMap<String, Value>;

/// A JSON number that keeps integers and floats apart so integers never
/// pick up a fractional part when printed.
#[derive(Debug, Clone)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Non-negative integers that fit are stored as `I64`, whichever way they were read.
    pub fn from_u64(v: u64) -> Number {
        i64::try_from(v).map_or(Number::U64(v), Number::I64)
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            Number::I64(v) => Some((*v).into()),
            Number::U64(v) => Some((*v).into()),
            Number::F64(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::I64(v) => Some(*v),
            Number::U64(v) => i64::try_from(*v).ok(),
            Number::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::I64(v) => *v as f64,
            Number::U64(v) => *v as f64,
            Number::F64(v) => *v,
        }
    }
}

/// Numeric equality: `1`, `1u64` and `1.0` are the same number.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::I64(v) => serializer.serialize_i64(*v),
            Number::U64(v) => serializer.serialize_u64(*v),
            Number::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Number::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Number::from_u64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Number::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A JSON document node.
///
/// Containers are reference counted: cloning a `Value` never copies a
/// subtree, and a tree produced by [`crate::set`] aliases every container
/// that was not on the written path. Use [`Value::ptr_eq`] to observe that.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Arc<Vec<Value>>),
    Object(Arc<Map>),
}

impl Value {
    pub fn empty_object() -> Value {
        Value::Object(Arc::new(Map::new()))
    }

    pub fn empty_array() -> Value {
        Value::Array(Arc::new(Vec::new()))
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Object member lookup; `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// True when both values are containers backed by the same allocation.
    /// Scalars have no identity and always compare `false`.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Strict JSON.
    pub fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str::<Value>(text)
    }

    /// JSON5: comments, unquoted keys, single quotes, trailing commas.
    pub fn parse_json5(text: &str) -> anyhow::Result<Value> {
        Ok(json5::from_str::<Value>(text)?)
    }

    /// `JSON.stringify(value, null, 2)` layout.
    pub fn to_json_pretty(&self) -> String {
        self.to_json_pretty_with_indent(2)
    }

    pub fn to_json_pretty_with_indent(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, Some(indent));
        out
    }

    pub fn to_json_compact(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, None);
        out
    }

    fn write_json(&self, out: &mut String, depth: usize, indent: Option<usize>) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::Number(n) => n.write_json(out),
            Value::String(s) => write_escaped_string(out, s),
            Value::Array(values) => {
                if values.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    push_newline(out, depth + 1, indent);
                    v.write_json(out, depth + 1, indent);
                }
                push_newline(out, depth, indent);
                out.push(']');
            }
            Value::Object(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    push_newline(out, depth + 1, indent);
                    write_escaped_string(out, k);
                    out.push(':');
                    if indent.is_some_and(|w| w > 0) {
                        out.push(' ');
                    }
                    v.write_json(out, depth + 1, indent);
                }
                push_newline(out, depth, indent);
                out.push('}');
            }
        }
    }
}

fn push_newline(out: &mut String, depth: usize, indent: Option<usize>) {
    // A zero indent behaves like JSON.stringify: no line breaks at all.
    if let Some(width) = indent.filter(|w| *w > 0) {
        out.push('\n');
        out.push_str(&" ".repeat(depth * width));
    }
}

impl Number {
    /// ECMAScript `Number.prototype.toString` conventions for the values JSON can carry.
    fn write_json(&self, out: &mut String) {
        match self {
            Number::I64(v) => out.push_str(&v.to_string()),
            Number::U64(v) => out.push_str(&v.to_string()),
            Number::F64(v) => {
                if !v.is_finite() {
                    out.push_str("null");
                } else if *v == 0.0 {
                    out.push('0');
                } else if v.fract() == 0.0 && v.abs() < 1e21 {
                    out.push_str(&format!("{v:.0}"));
                } else {
                    let mut buf = ryu::Buffer::new();
                    let s = buf.format_finite(*v);
                    match s.split_once('e') {
                        // ryu switches to exponent form one decade earlier than ECMAScript.
                        Some((mantissa, "-6")) => {
                            let (sign, digits) = match mantissa.strip_prefix('-') {
                                Some(rest) => ("-", rest),
                                None => ("", mantissa),
                            };
                            out.push_str(sign);
                            out.push_str("0.00000");
                            out.push_str(&digits.replace('.', ""));
                        }
                        Some((mantissa, exp)) if !exp.starts_with('-') => {
                            out.push_str(mantissa);
                            out.push_str("e+");
                            out.push_str(exp);
                        }
                        _ => out.push_str(s),
                    }
                }
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::I64(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Number(Number::I64(v.into()))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Number(Number::from_u64(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::F64(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(Arc::new(v))
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Object(Arc::new(v))
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Object(Arc::new(iter.into_iter().collect()))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(values) => values.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                Value::deserialize(d)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::from_u64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Value::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<Value>()? {
                    values.push(value);
                }
                Ok(Value::Array(Arc::new(values)))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = Map::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(Arc::new(values)))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Number, Value};

    #[test]
    fn parse_json_preserves_member_order() {
        let v = Value::parse_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn parse_json_rejects_json5_syntax() {
        assert!(Value::parse_json("{ a: 1 }").is_err());
        assert!(Value::parse_json5("{ a: 1, }").is_ok());
    }

    #[test]
    fn pretty_output_matches_stringify_layout() {
        let v = Value::parse_json(r#"{"a":1,"b":[true,null],"c":{},"d":[]}"#).unwrap();
        assert_eq!(
            v.to_json_pretty(),
            "{\n  \"a\": 1,\n  \"b\": [\n    true,\n    null\n  ],\n  \"c\": {},\n  \"d\": []\n}"
        );
    }

    #[test]
    fn integer_like_keys_keep_insertion_order() {
        let v = Value::parse_json(r#"{"x": 1, "2": "two", "10": 3}"#).unwrap();
        assert_eq!(v.to_json_compact(), r#"{"x":1,"2":"two","10":3}"#);
    }

    #[test]
    fn compact_output_has_no_whitespace() {
        let v = Value::parse_json(r#"{ "a" : [1, 2], "b": "x" }"#).unwrap();
        assert_eq!(v.to_json_compact(), r#"{"a":[1,2],"b":"x"}"#);
    }

    #[test]
    fn zero_indent_is_compact() {
        let v = Value::parse_json(r#"{"a":[1]}"#).unwrap();
        assert_eq!(v.to_json_pretty_with_indent(0), r#"{"a":[1]}"#);
    }

    #[test]
    fn floats_print_like_ecmascript() {
        let cases = [
            (1.0, "1"),
            (-0.0, "0"),
            (1.5, "1.5"),
            (1e21, "1e+21"),
            (1.5e-7, "1.5e-7"),
            (-1.5e-6, "-0.0000015"),
            (0.25, "0.25"),
            (f64::NAN, "null"),
            (f64::INFINITY, "null"),
        ];
        for (input, expected) in cases {
            assert_eq!(Value::Number(Number::F64(input)).to_json_compact(), expected);
        }
    }

    #[test]
    fn strings_escape_control_characters_only() {
        let v = Value::from("caf\u{e9} \"q\"\n\u{1}");
        assert_eq!(v.to_json_compact(), "\"caf\u{e9} \\\"q\\\"\\n\\u0001\"");
    }

    #[test]
    fn clones_alias_containers() {
        let v = Value::parse_json(r#"{"a":{"b":1}}"#).unwrap();
        let copy = v.clone();
        assert!(v.ptr_eq(&copy));
        assert!(v.get("a").unwrap().ptr_eq(copy.get("a").unwrap()));

        let rebuilt = Value::parse_json(r#"{"a":{"b":1}}"#).unwrap();
        assert_eq!(v, rebuilt);
        assert!(!v.ptr_eq(&rebuilt));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(Value::parse_json("5").unwrap(), Value::from(5));
        assert_eq!(Number::F64(2.0), Number::I64(2));
        assert_ne!(Number::F64(2.5), Number::I64(2));
        assert!(matches!(Value::parse_json("7").unwrap(), Value::Number(Number::I64(7))));
    }

    #[test]
    fn large_unsigned_integers_survive() {
        let v = Value::parse_json("18446744073709551615").unwrap();
        assert_eq!(v, Value::Number(Number::U64(u64::MAX)));
        assert_eq!(v.to_json_compact(), "18446744073709551615");
    }
}
