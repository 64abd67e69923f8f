use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// A number as it appeared in the document. Integers and floats stay distinct so
/// validation can reject `x: 1.5` instead of silently truncating it.
#[derive(Debug, Clone, PartialEq)]
pub enum MapNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl MapNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MapNumber::I64(v) => Some(*v),
            MapNumber::U64(v) => i64::try_from(*v).ok(),
            MapNumber::F64(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for MapNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = MapNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(MapNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(MapNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(MapNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A loosely-typed record as read from a map or config file.
/// Decoders in `tile`, `symbol` and `save` turn these into typed entities.
#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    Null,
    Bool(bool),
    Number(MapNumber),
    String(String),
    Array(Vec<MapValue>),
    Object(IndexMap<String, MapValue>),
}

impl MapValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, MapValue>> {
        match self {
            MapValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[MapValue]> {
        match self {
            MapValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MapValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MapValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&MapValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            MapValue::Null => "null",
            MapValue::Bool(_) => "bool",
            MapValue::Number(_) => "number",
            MapValue::String(_) => "string",
            MapValue::Array(_) => "array",
            MapValue::Object(_) => "object",
        }
    }

    pub fn parse_json5(text: &str) -> anyhow::Result<MapValue> {
        Ok(json5::from_str::<MapValue>(text)?)
    }

    /// Pretty output with 4-space indentation and quoted keys, so a map file is
    /// also plain JSON. Always ends with a newline.
    pub fn to_json5_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json5(&mut out, 0);
        out.push('\n');
        out
    }

    fn write_json5(&self, out: &mut String, indent: usize) {
        match self {
            MapValue::Null => out.push_str("null"),
            MapValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            MapValue::Number(n) => n.write_json5(out),
            MapValue::String(s) => write_escaped_string(out, s),
            MapValue::Array(values) => {
                if values.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push_str("[\n");
                for (i, v) in values.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 4));
                    v.write_json5(out, indent + 4);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push(']');
            }
            MapValue::Object(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{\n");
                for (i, (k, v)) in map.iter().enumerate() {
                    out.push_str(&" ".repeat(indent + 4));
                    write_escaped_string(out, k);
                    out.push_str(": ");
                    v.write_json5(out, indent + 4);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&" ".repeat(indent));
                out.push('}');
            }
        }
    }
}

impl From<i64> for MapValue {
    fn from(v: i64) -> Self {
        MapValue::Number(MapNumber::I64(v))
    }
}

impl From<bool> for MapValue {
    fn from(v: bool) -> Self {
        MapValue::Bool(v)
    }
}

impl From<&str> for MapValue {
    fn from(v: &str) -> Self {
        MapValue::String(v.to_owned())
    }
}

impl From<String> for MapValue {
    fn from(v: String) -> Self {
        MapValue::String(v)
    }
}

impl MapNumber {
    fn write_json5(&self, out: &mut String) {
        match self {
            MapNumber::I64(v) => out.push_str(&v.to_string()),
            MapNumber::U64(v) => out.push_str(&v.to_string()),
            MapNumber::F64(v) => out.push_str(ryu::Buffer::new().format(*v)),
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
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04X}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for MapValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = MapValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(MapValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(MapValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(MapValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(MapValue::Number(MapNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(MapValue::Number(MapNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(MapValue::Number(MapNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(MapValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(MapValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<MapValue>()? {
                    values.push(value);
                }
                Ok(MapValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, MapValue>()? {
                    values.insert(key, value);
                }
                Ok(MapValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Reads `key` from a record, converting it with `extract`.
/// A missing key is `Ok(None)`; a present key of the wrong shape is an error.
pub(crate) fn typed_field<T>(
    record_name: &'static str,
    obj: &IndexMap<String, MapValue>,
    key: &str,
    expected: &'static str,
    extract: impl FnOnce(&MapValue) -> Option<T>,
) -> crate::error::Result<Option<T>> {
    let Some(value) = obj.get(key) else {
        return Ok(None);
    };
    extract(value)
        .map(Some)
        .ok_or_else(|| crate::error::SaveError::InvalidField {
            record: record_name,
            field: key.to_string(),
            expected,
        })
}

#[cfg(test)]
mod tests {
    use super::{MapNumber, MapValue};
    use indexmap::IndexMap;

    #[test]
    fn parse_json5_keeps_integers_and_floats_apart() {
        let v = MapValue::parse_json5("{ a: 3, b: -4, c: 1.5, d: 'x', }").unwrap();

        assert_eq!(v.get("a").and_then(MapValue::as_i64), Some(3));
        assert_eq!(v.get("b").and_then(MapValue::as_i64), Some(-4));
        assert!(matches!(
            v.get("c"),
            Some(MapValue::Number(MapNumber::F64(_)))
        ));
        assert_eq!(v.get("c").and_then(MapValue::as_i64), None);
        assert_eq!(v.get("d").and_then(MapValue::as_str), Some("x"));
    }

    #[test]
    fn pretty_output_quotes_keys_and_indents() {
        let mut map = IndexMap::new();
        map.insert("x".to_string(), MapValue::from(1));
        map.insert(
            "tags".to_string(),
            MapValue::Array(vec![MapValue::from("A")]),
        );
        map.insert("empty".to_string(), MapValue::Object(IndexMap::new()));

        let text = MapValue::Object(map).to_json5_pretty();
        assert_eq!(
            text,
            "{\n    \"x\": 1,\n    \"tags\": [\n        \"A\"\n    ],\n    \"empty\": {}\n}\n"
        );
    }

    #[test]
    fn escaped_strings_survive_a_reparse() {
        let v = MapValue::parse_json5(r#"{ "s": "line\nbreak \"quoted\"", "n": null, "f": 0.25 }"#)
            .unwrap();
        let again = MapValue::parse_json5(&v.to_json5_pretty()).unwrap();
        assert_eq!(v, again);
    }

    #[test]
    fn type_names_describe_variants() {
        assert_eq!(MapValue::Null.type_name(), "null");
        assert_eq!(MapValue::from(true).type_name(), "bool");
        assert_eq!(MapValue::Array(Vec::new()).type_name(), "array");
    }
}
