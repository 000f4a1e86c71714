use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use vdiff_types::Value;

use crate::collection::DifferenceCollection;
use crate::combination::Combination;

/// The result of comparing two values.
///
/// Holds both operands as they were compared (after canonicalization, when
/// enabled), every difference found anywhere in the tree in walk order, and
/// the combination tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    a: Value,
    b: Value,
    differences: DifferenceCollection,
    combination: Combination,
}

impl Comparison {
    pub(crate) fn new(
        a: Value,
        b: Value,
        differences: DifferenceCollection,
        combination: Combination,
    ) -> Self {
        Self {
            a,
            b,
            differences,
            combination,
        }
    }

    /// Returns `true` if no differences were found.
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn a(&self) -> &Value {
        &self.a
    }

    pub fn b(&self) -> &Value {
        &self.b
    }

    pub fn differences(&self) -> &DifferenceCollection {
        &self.differences
    }

    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Take the comparison apart: `(a, b, differences, combination)`.
    pub fn into_parts(self) -> (Value, Value, DifferenceCollection, Combination) {
        (self.a, self.b, self.differences, self.combination)
    }
}

impl Serialize for Comparison {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Comparison", 5)?;
        state.serialize_field("a", &self.a)?;
        state.serialize_field("b", &self.b)?;
        state.serialize_field("equal", &self.is_equal())?;
        state.serialize_field("differences", &self.differences)?;
        state.serialize_field("combination", &self.combination)?;
        state.end()
    }
}
