use serde::{Serialize, Serializer};

use crate::difference::{Difference, DifferenceRecord};

/// Ordered, append-only list of [`Difference`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DifferenceCollection {
    differences: Vec<Difference>,
}

impl DifferenceCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, difference: Difference) {
        self.differences.push(difference);
    }

    pub fn len(&self) -> usize {
        self.differences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Difference> {
        self.differences.get(index)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        self.differences.iter()
    }

    /// Paths of all differences, in insertion order.
    pub fn paths(&self) -> Vec<&str> {
        self.differences.iter().map(Difference::path).collect()
    }

    /// Export as `{a, b, path}` records.
    pub fn to_records(&self) -> Vec<DifferenceRecord> {
        self.differences.iter().map(Difference::to_record).collect()
    }
}

impl Extend<Difference> for DifferenceCollection {
    fn extend<I: IntoIterator<Item = Difference>>(&mut self, iter: I) {
        self.differences.extend(iter);
    }
}

impl FromIterator<Difference> for DifferenceCollection {
    fn from_iter<I: IntoIterator<Item = Difference>>(iter: I) -> Self {
        Self {
            differences: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DifferenceCollection {
    type Item = Difference;
    type IntoIter = std::vec::IntoIter<Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.into_iter()
    }
}

impl<'a> IntoIterator for &'a DifferenceCollection {
    type Item = &'a Difference;
    type IntoIter = std::slice::Iter<'a, Difference>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.iter()
    }
}

impl Serialize for DifferenceCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.differences)
    }
}
