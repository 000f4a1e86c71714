use std::fmt;

use serde::{Deserialize, Serialize};

/// A key inside a [`Container`](crate::Container).
///
/// Keys are totally ordered: every `Index` sorts before every `Name`, and keys
/// of the same variant sort by their natural order. The comparator relies on
/// this to walk the union of two key sets deterministically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Positional key of a list element.
    Index(u64),
    /// Named key of a map entry or record field.
    Name(String),
}

impl Key {
    /// Returns the index if this is an `Index` key.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    /// Returns the name if this is a `Name` key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(n) => Some(n),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(n) => f.write_str(n),
        }
    }
}

impl From<u64> for Key {
    fn from(i: u64) -> Self {
        Key::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as u64)
    }
}

impl From<&str> for Key {
    fn from(n: &str) -> Self {
        match decimal_index(n) {
            Some(i) => Key::Index(i),
            None => Key::Name(n.to_string()),
        }
    }
}

impl From<String> for Key {
    fn from(n: String) -> Self {
        match decimal_index(&n) {
            Some(i) => Key::Index(i),
            None => Key::Name(n),
        }
    }
}

fn decimal_index(name: &str) -> Option<u64> {
    let digits = !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit());
    if !digits || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    name.parse().ok()
}
