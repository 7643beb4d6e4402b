//! Deserializer that lets configuration values meet the target type halfway
//!
//! Environment variables and in-memory pairs arrive as strings. The target
//! type decides what they become: a `u16` field parses `"8080"`, a `String`
//! field keeps `"007"` as written. Struct keys match the declared fields
//! ignoring case, `_` and `-`, at any depth.

use super::tree::normalize_key;
use serde::de::{
    DeserializeOwned, Deserializer, Error as _, IntoDeserializer, Unexpected, Visitor,
    value::{MapDeserializer, SeqDeserializer},
};
use serde_json::{Error, Map, Value};

/// Deserialize `T` from a configuration value
pub(crate) fn from_config_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(ConfigValue(value))
}

struct ConfigValue(Value);

impl<'de> IntoDeserializer<'de, Error> for ConfigValue {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

fn visit_array<'de, V: Visitor<'de>>(items: Vec<Value>, visitor: V) -> Result<V::Value, Error> {
    let mut seq = SeqDeserializer::<_, Error>::new(items.into_iter().map(ConfigValue));
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;
    Ok(value)
}

fn visit_object<'de, V: Visitor<'de>>(
    entries: impl Iterator<Item = (String, Value)>,
    visitor: V,
) -> Result<V::Value, Error> {
    let mut map = MapDeserializer::<_, Error>::new(entries.map(|(k, v)| (k, ConfigValue(v))));
    let value = visitor.visit_map(&mut map)?;
    map.end()?;
    Ok(value)
}

/// `{"0": a, "1": b}` (as produced by `Servers__0` env vars) becomes `[a, b]`
fn indexed_array(map: &mut Map<String, Value>) -> Option<Vec<Value>> {
    if map.is_empty() || map.keys().any(|k| k.parse::<usize>().is_err()) {
        return None;
    }
    let mut indexed: Vec<(usize, Value)> = std::mem::take(map)
        .into_iter()
        .filter_map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
        .collect();
    indexed.sort_by_key(|(i, _)| *i);
    Some(indexed.into_iter().map(|(_, v)| v).collect())
}

macro_rules! parse_from_str {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                if let Value::String(s) = &self.0 {
                    return match s.trim().parse::<$ty>() {
                        Ok(n) => visitor.$visit(n),
                        Err(_) => Err(Error::invalid_value(Unexpected::Str(s), &visitor)),
                    };
                }
                self.deserialize_any(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for ConfigValue {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else if let Some(f) = n.as_f64() {
                    visitor.visit_f64(f)
                } else {
                    Err(Error::custom(format!("unsupported number {n}")))
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => visit_array(items, visitor),
            Value::Object(map) => visit_object(map.into_iter(), visitor),
        }
    }

    parse_from_str! {
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
        deserialize_char => char, visit_char;
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        if let Value::String(s) = &self.0 {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                return visitor.visit_bool(true);
            }
            if s.eq_ignore_ascii_case("false") {
                return visitor.visit_bool(false);
            }
            return Err(Error::invalid_value(Unexpected::Str(s), &visitor));
        }
        self.deserialize_any(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Number(n) => visitor.visit_string(n.to_string()),
            Value::Bool(b) => visitor.visit_string(b.to_string()),
            other => ConfigValue(other).deserialize_any(visitor),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(ConfigValue(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Object(mut map) => match indexed_array(&mut map) {
                Some(items) => visit_array(items, visitor),
                None => visit_object(map.into_iter(), visitor),
            },
            other => ConfigValue(other).deserialize_any(visitor),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        let Value::Object(map) = self.0 else {
            return self.deserialize_any(visitor);
        };
        let entries = map.into_iter().map(|(key, value)| {
            let normalized = normalize_key(&key);
            let field = fields
                .iter()
                .find(|f| normalize_key(f) == normalized)
                .map_or(key, |f| (*f).to_string());
            (field, value)
        });
        visit_object(entries, visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    serde::forward_to_deserialize_any! {
        bytes byte_buf unit unit_struct tuple tuple_struct map identifier ignored_any
    }
}
