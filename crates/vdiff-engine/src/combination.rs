use std::collections::BTreeMap;

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use vdiff_types::{Key, Value};

use crate::difference::Difference;

/// The mirrored tree produced by a comparison.
///
/// Equal nodes hold the shared value, divergent nodes hold the
/// [`Difference`] found there, and containers the comparison descended into
/// hold one child combination per key of the union of both key sets.
#[derive(Clone, Debug, PartialEq)]
pub enum Combination {
    /// Both operands were equal here.
    Value(Value),
    /// The operands differ here (kind, scalar value, or presence).
    Difference(Difference),
    /// Both operands were containers of the same class.
    Nested(BTreeMap<Key, Combination>),
}

impl Combination {
    pub fn is_difference(&self) -> bool {
        matches!(self, Combination::Difference(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Combination::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_difference(&self) -> Option<&Difference> {
        match self {
            Combination::Difference(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&BTreeMap<Key, Combination>> {
        match self {
            Combination::Nested(children) => Some(children),
            _ => None,
        }
    }

    /// Child combination under `key`, if this node is nested.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Combination> {
        self.as_nested()?.get(&key.into())
    }
}

impl From<Value> for Combination {
    fn from(value: Value) -> Self {
        Combination::Value(value)
    }
}

impl From<Difference> for Combination {
    fn from(difference: Difference) -> Self {
        Combination::Difference(difference)
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Combination::Value(value) => value.serialize(serializer),
            Combination::Difference(difference) => {
                let rendered = difference.render().map_err(S::Error::custom)?;
                serializer.serialize_str(&rendered)
            }
            Combination::Nested(children) => {
                let sequential = children
                    .keys()
                    .enumerate()
                    .all(|(i, k)| k.as_index() == Some(i as u64));
                if sequential {
                    serializer.collect_seq(children.values())
                } else {
                    let mut map = serializer.serialize_map(Some(children.len()))?;
                    for (key, child) in children {
                        map.serialize_entry(&key.to_string(), child)?;
                    }
                    map.end()
                }
            }
        }
    }
}
