use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::TypeError;
use crate::value::Value;

/// What kind of object a [`Record`] was captured from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A plain field bag: nothing but named data.
    Plain,
    /// An object with its own type identity. The comparator refuses these.
    Typed(String),
}

/// A named-field object.
///
/// Records are distinct from containers: a record compared against a
/// container is a type mismatch, and only [`RecordKind::Plain`] records may be
/// compared at all.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    kind: RecordKind,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a plain record from fields.
    pub fn plain<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            kind: RecordKind::Plain,
            fields: collect_fields(fields),
        }
    }

    /// Create a record that carries a type identity.
    pub fn typed<K, V, I>(type_name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            kind: RecordKind::Typed(type_name.into()),
            fields: collect_fields(fields),
        }
    }

    /// Capture a serializable data structure as a plain record.
    ///
    /// Anything whose serde representation is a struct or map is a field
    /// bag; every other shape is rejected with [`TypeError::NotARecord`].
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, TypeError> {
        let json =
            serde_json::to_value(value).map_err(|e| TypeError::Serialization(e.to_string()))?;
        match json {
            serde_json::Value::Object(fields) => Ok(Self::plain(
                fields.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
            other => Err(TypeError::NotARecord(json_shape(&other).to_string())),
        }
    }

    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    pub fn is_plain(&self) -> bool {
        self.kind == RecordKind::Plain
    }

    /// The type name of a typed record, `None` for plain records.
    pub fn type_name(&self) -> Option<&str> {
        match &self.kind {
            RecordKind::Plain => None,
            RecordKind::Typed(name) => Some(name),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut Value> {
        self.fields.values_mut()
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn collect_fields<K, V, I>(fields: I) -> BTreeMap<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn json_shape(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
