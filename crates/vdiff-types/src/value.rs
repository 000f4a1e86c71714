//! The comparable value model.
//!
//! [`Value`] is a closed tagged union. Floats and opaque values are
//! representable so that inputs coming from JSON or foreign sources can be
//! carried into the comparator, which rejects them.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::key::Key;
use crate::record::Record;

/// The type tag of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    String,
    Container,
    Record,
    Float,
    Opaque,
}

impl ValueKind {
    /// Returns `true` if the comparator accepts values of this kind.
    pub fn is_supported(self) -> bool {
        !matches!(self, ValueKind::Float | ValueKind::Opaque)
    }

    /// Returns `true` for the leaf kinds compared by value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            ValueKind::Null | ValueKind::Boolean | ValueKind::Integer | ValueKind::String
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::String => "string",
            ValueKind::Container => "container",
            ValueKind::Record => "record",
            ValueKind::Float => "float",
            ValueKind::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be handed to the comparator.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    String(String),
    Container(Container),
    Record(Record),
    /// Floating-point number. Unsupported by the comparator.
    Float(f64),
    /// A foreign value identified only by its type name. Unsupported by the
    /// comparator.
    Opaque(String),
}

impl Value {
    /// The type tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Container(_) => ValueKind::Container,
            Value::Record(_) => ValueKind::Record,
            Value::Float(_) => ValueKind::Float,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    /// Build a list-like container value from elements.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::Container(Container::list(items))
    }

    /// Build a container value from key-value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        Value::Container(entries.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Value::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Convert into a `serde_json::Value`.
    pub fn to_json(&self) -> Result<serde_json::Value, TypeError> {
        serde_json::to_value(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Compact canonical JSON text. List-like containers become arrays and
    /// everything keyed becomes an object with keys in sorted order.
    pub fn to_canonical_json(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Container> for Value {
    fn from(c: Container) -> Self {
        Value::Container(c)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => Value::map(
                fields
                    .into_iter()
                    .map(|(k, v)| (Key::from(k), Value::from(v))),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::String(s) => serializer.serialize_str(s),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Container(c) => c.serialize(serializer),
            Value::Record(r) => r.serialize(serializer),
            Value::Opaque(type_name) => Err(S::Error::custom(format!(
                "opaque value of type {type_name} cannot be serialized"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

/// An ordered key-value grouping.
///
/// Entries are kept sorted by [`Key`]. A container is *list-like* when its
/// keys are exactly `0..n-1` (the empty container included) and *map-like*
/// otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    entries: BTreeMap<Key, Value>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list-like container keyed `0..n-1` in iteration order.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let entries = items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::from(i), v.into()))
            .collect();
        Self { entries }
    }

    /// Insert an entry, returning the previous value under that key.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter()
    }

    /// Returns `true` if the keys are exactly `0..n-1`.
    pub fn is_list_like(&self) -> bool {
        is_list_like(self.entries.keys())
    }

    /// Consume the container, yielding its values in key order.
    pub fn into_values(self) -> impl Iterator<Item = Value> {
        self.entries.into_values()
    }

    pub fn into_entries(self) -> BTreeMap<Key, Value> {
        self.entries
    }
}

/// Returns `true` if the sorted key sequence is exactly `0..n-1`.
pub(crate) fn is_list_like<'a>(keys: impl Iterator<Item = &'a Key>) -> bool {
    keys.enumerate()
        .all(|(i, k)| k.as_index() == Some(i as u64))
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Container {
    type Item = (Key, Value);
    type IntoIter = std::collections::btree_map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = (&'a Key, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<BTreeMap<Key, Value>> for Container {
    fn from(entries: BTreeMap<Key, Value>) -> Self {
        Self { entries }
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list_like() {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for value in self.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (key, value) in self.iter() {
                map.serialize_entry(&key.to_string(), value)?;
            }
            map.end()
        }
    }
}
