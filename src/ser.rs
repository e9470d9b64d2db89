//! Serde output support for decoded values.
//!
//! Producing the PHP wire format is out of scope, but decoded trees are
//! routinely exported to other formats for inspection, so every decoded
//! type implements [`serde::Serialize`]:
//!
//! - [`PhpBytes`] serializes as a string when its content is UTF-8 and as
//!   raw bytes otherwise.
//! - Integer array keys pass through as integers; backends that require
//!   string keys (like serde_json) stringify them.
//! - [`PhpObject`] serializes as `{ "class": ..., "properties": ... }`,
//!   with the flat entry list as the property map (visibility markers
//!   intact in the keys).
//!
//! ## Examples
//!
//! ```rust
//! use phpsess::decode_value;
//!
//! let value = decode_value(b"a:2:{s:1:\"a\";i:1;s:1:\"b\";i:2;}").unwrap();
//! let json = serde_json::to_string(&value).unwrap();
//! assert_eq!(json, r#"{"a":1,"b":2}"#);
//! ```

use crate::map::PhpMap;
use crate::object::PhpObject;
use crate::session::Session;
use crate::value::{ArrayKey, PhpBytes, PhpValue};
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

impl Serialize for PhpBytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_str() {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_bytes(self.as_bytes()),
        }
    }
}

impl Serialize for ArrayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ArrayKey::Int(i) => serializer.serialize_i64(*i),
            ArrayKey::Str(bytes) => bytes.serialize(serializer),
        }
    }
}

impl Serialize for PhpValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PhpValue::Null => serializer.serialize_unit(),
            PhpValue::Bool(b) => serializer.serialize_bool(*b),
            PhpValue::Int(i) => serializer.serialize_i64(*i),
            PhpValue::Float(f) => serializer.serialize_f64(*f),
            PhpValue::Bytes(bytes) => bytes.serialize(serializer),
            PhpValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            PhpValue::Map(map) => map.serialize(serializer),
            PhpValue::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for PhpMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for PhpObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut object = serializer.serialize_struct("PhpObject", 2)?;
        object.serialize_field("class", self.class_name())?;
        object.serialize_field("properties", &Entries(self.entries()))?;
        object.end()
    }
}

impl Serialize for Session {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Serializes a flat property entry list as a map.
struct Entries<'a>(&'a [(PhpBytes, PhpValue)]);

impl Serialize for Entries<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
