//! Binding parsed documents to Rust types through serde.
//!
//! Parsing always produces a complete tree first; [`ValueDeserializer`] then
//! walks that tree and feeds it to any `Deserialize` implementation. Scopes
//! deserialize as maps (and therefore as structs), arrays and tuples as
//! sequences, and each scalar through the visitor method of its own kind,
//! so integer range checks are done by the target type.
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde::Deserialize;
//! use skopik::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     ports: Vec<u16>,
//!     tls: Option<bool>,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     server: Server,
//! }
//!
//! let config: Config = from_str("server:{ host = \"db1\"; ports = [80, 443] }").unwrap();
//! assert_eq!(config.server.host, "db1");
//! assert_eq!(config.server.ports, vec![80, 443]);
//! assert_eq!(config.server.tls, None);
//! ```

use crate::map::ScopeMap;
use crate::{Error, Number, Result, Value};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{de, forward_to_deserialize_any};

/// Deserializes an instance of `T` from a document tree.
///
/// # Examples
///
/// ```rust
/// use skopik::{from_value, Value};
///
/// let n: u8 = from_value(Value::from(200)).unwrap();
/// assert_eq!(n, 200);
/// assert!(from_value::<u8>(Value::from(300)).is_err());
/// ```
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// A serde `Deserializer` that consumes one [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    #[must_use]
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Int32(v), _) => visitor.visit_i32(v),
            Value::Number(Number::Int64(v), _) => visitor.visit_i64(v),
            Value::Number(Number::UInt32(v), _) => visitor.visit_u32(v),
            Value::Number(Number::UInt64(v), _) => visitor.visit_u64(v),
            Value::Number(Number::Float32(v), _) => visitor.visit_f32(v),
            Value::Number(Number::Float64(v), _) => visitor.visit_f64(v),
            Value::Bits(bits) => visitor.visit_u32(bits.bits()),
            Value::String(s) => visitor.visit_string(s),
            Value::Scope(scope) => visitor.visit_map(entries(scope.into_entries())),
            Value::Array(array) => visitor.visit_seq(elements(array.into_vec())),
            Value::Tuple(tuple) => visitor.visit_seq(elements(tuple.into_vec())),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Scope(scope) if scope.len() == 1 => {
                match scope.into_entries().into_iter().next() {
                    Some((name, payload)) => visitor.visit_enum(Variant { name, payload }),
                    None => Err(Error::custom("expected an enum variant")),
                }
            }
            other => Err(Error::custom(format!(
                "expected an enum as a string or a single-entry scope, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Elements of an array or tuple, handed out front to back.
struct Elements(std::vec::IntoIter<Value>);

impl<'de> de::SeqAccess<'de> for Elements {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        self.0
            .next()
            .map(|value| seed.deserialize(ValueDeserializer::new(value)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.0.len())
    }
}

/// Entries of a scope in document order. The value of the entry whose key
/// was just handed out waits in `pending`.
struct Entries {
    iter: indexmap::map::IntoIter<String, Value>,
    pending: Option<Value>,
}

impl<'de> de::MapAccess<'de> for Entries {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.pending = Some(value);
        seed.deserialize(key.into_deserializer()).map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let value = self
            .pending
            .take()
            .ok_or_else(|| Error::custom("scope value requested before its key"))?;
        seed.deserialize(ValueDeserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// An enum written as a single-entry scope: the key names the variant and
/// the value is its payload.
struct Variant {
    name: String,
    payload: Value,
}

impl<'de> de::EnumAccess<'de> for Variant {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StrDeserializer<'_, Error> = self.name.as_str().into_deserializer();
        let tag = seed.deserialize(name)?;
        Ok((tag, self))
    }
}

impl<'de> de::VariantAccess<'de> for Variant {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.payload {
            Value::Null => Ok(()),
            other => Err(unexpected(&self.name, "no payload", &other)),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.payload))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.payload {
            Value::Array(array) => visitor.visit_seq(elements(array.into_vec())),
            Value::Tuple(tuple) => visitor.visit_seq(elements(tuple.into_vec())),
            other => Err(unexpected(&self.name, "an array or tuple", &other)),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.payload {
            Value::Scope(scope) => visitor.visit_map(entries(scope.into_entries())),
            other => Err(unexpected(&self.name, "a scope", &other)),
        }
    }
}

fn elements(items: Vec<Value>) -> Elements {
    Elements(items.into_iter())
}

fn entries(map: ScopeMap) -> Entries {
    Entries {
        iter: map.into_iter(),
        pending: None,
    }
}

fn unexpected(variant: &str, expected: &str, found: &Value) -> Error {
    Error::custom(format!(
        "variant '{}' expects {}, found {}",
        variant,
        expected,
        found.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;
    use serde::Deserialize;
    use std::collections::HashMap;

    fn bind<T: DeserializeOwned>(src: &str) -> Result<T> {
        from_value(Value::Scope(parse_str(src)?))
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Window {
        title: String,
        size: (u32, u32),
        visible: bool,
        opacity: f32,
    }

    #[test]
    fn test_struct_from_scope() {
        let window: Window =
            bind(r#"title = "Main"; size = (800u, 600u); visible = true; opacity = 0.5f"#).unwrap();
        assert_eq!(
            window,
            Window {
                title: "Main".to_string(),
                size: (800, 600),
                visible: true,
                opacity: 0.5,
            }
        );
    }

    #[test]
    fn test_out_of_range_integer() {
        #[derive(Deserialize, Debug)]
        #[allow(dead_code)]
        struct Small {
            n: u8,
        }
        let err = bind::<Small>("n = 256").unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Mode {
        Fast,
        Limited(u32),
        Window { from: i32, to: i32 },
    }

    #[test]
    fn test_enums() {
        let modes: HashMap<String, Mode> =
            bind("a = Fast; b:{ Limited = 5 }; c:{ Window:{ from = -1; to = 1 } }").unwrap();
        assert_eq!(modes["a"], Mode::Fast);
        assert_eq!(modes["b"], Mode::Limited(5));
        assert_eq!(modes["c"], Mode::Window { from: -1, to: 1 });
    }

    #[test]
    fn test_enum_payload_mismatch() {
        let err = bind::<HashMap<String, Mode>>("a:{ Fast = 1 }").unwrap_err();
        assert!(err.to_string().contains("variant 'Fast'"), "{err}");
        let err = bind::<HashMap<String, Mode>>("a:{ Window = 3 }").unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
        assert!(bind::<HashMap<String, Mode>>("a:{ Slow = 1 }").is_err());
    }

    #[test]
    fn test_options_and_gaps() {
        let values: HashMap<String, Vec<Option<i32>>> = bind("v = [1, [3]: 4]").unwrap();
        assert_eq!(values["v"], vec![Some(1), None, None, Some(4)]);
    }

    #[test]
    fn test_bits_and_hex_as_integers() {
        let values: HashMap<String, u32> = bind("flags = 1010b; mask = 0xFFu").unwrap();
        assert_eq!(values["flags"], 10);
        assert_eq!(values["mask"], 255);
    }

    #[test]
    fn test_value_round_trips_through_itself() {
        let root = Value::Scope(parse_str("a = [1, 2]; b:{ c = x }").unwrap());
        let copy: Value = from_value(root.clone()).unwrap();
        assert_eq!(copy.lookup("a.1"), root.lookup("a.1"));
        assert_eq!(copy.lookup("b.c").and_then(Value::as_str), Some("x"));
    }
}
