//! The recursive structural comparison.
//!
//! [`Comparator::calculate`] runs in three phases:
//!
//! 1. **Validation** of both operands: every node must be of a supported kind,
//!    every record must be plain, and nesting must stay within
//!    [`ComparatorConfig::max_depth`]. A violation fails the whole call.
//! 2. **Canonicalization** of private copies when `ignore_array_sorting` is
//!    set (see [`crate::canonical`]).
//! 3. **Walk**: both trees are descended together, emitting one
//!    [`Difference`] per divergence point and building the [`Combination`].
//!
//! # Invariants
//!
//! - A combination node is `Nested` iff both operands there were containers,
//!   or both were plain records, and the walk descended into them.
//! - Differences are emitted in walk order: keys ascending, depth first.
//! - Mismatches are data; only validation failures are errors.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};
use vdiff_types::{Container, Key, Record, Value};

use crate::canonical::canonicalize;
use crate::collection::DifferenceCollection;
use crate::combination::Combination;
use crate::comparison::Comparison;
use crate::config::{ComparatorConfig, ROOT_PATH};
use crate::difference::Difference;
use crate::error::{DiffError, DiffResult};

/// Compares two values.
#[derive(Clone, Debug)]
pub struct Comparator {
    a: Value,
    b: Value,
    config: ComparatorConfig,
}

impl Comparator {
    /// Create a comparator with the default configuration.
    pub fn new(a: impl Into<Value>, b: impl Into<Value>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            config: ComparatorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ComparatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    pub fn a(&self) -> &Value {
        &self.a
    }

    pub fn b(&self) -> &Value {
        &self.b
    }

    pub fn ignore_array_sorting(&self) -> bool {
        self.config.ignore_array_sorting
    }

    pub fn set_ignore_array_sorting(&mut self, ignore_array_sorting: bool) {
        self.config.ignore_array_sorting = ignore_array_sorting;
    }

    /// Compare the two operands.
    ///
    /// The operands held by the comparator are never modified; with
    /// `ignore_array_sorting` the returned [`Comparison`] holds the
    /// canonicalized copies.
    pub fn calculate(&self) -> DiffResult<Comparison> {
        debug!(
            ignore_array_sorting = self.config.ignore_array_sorting,
            max_depth = self.config.max_depth,
            "comparison started"
        );

        self.validate(&self.a, ROOT_PATH, 0)?;
        self.validate(&self.b, ROOT_PATH, 0)?;

        let mut a = self.a.clone();
        let mut b = self.b.clone();
        if self.config.ignore_array_sorting {
            canonicalize(&mut a)?;
            canonicalize(&mut b)?;
            debug!("operands canonicalized");
        }

        let mut differences = DifferenceCollection::new();
        let combination = self.do_calculate(&a, &b, ROOT_PATH, &mut differences)?;

        debug!(differences = differences.len(), "comparison finished");
        Ok(Comparison::new(a, b, differences, combination))
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    fn validate(&self, value: &Value, path: &str, depth: usize) -> DiffResult<()> {
        if depth > self.config.max_depth {
            return Err(DiffError::DepthLimitExceeded {
                limit: self.config.max_depth,
                path: path.to_string(),
            });
        }

        match value {
            Value::Null | Value::Bool(_) | Value::Integer(_) | Value::String(_) => Ok(()),
            Value::Float(_) | Value::Opaque(_) => Err(DiffError::UnsupportedType(value.kind())),
            Value::Record(record) => {
                ensure_plain(record)?;
                for (name, field) in record.fields() {
                    self.validate(field, &child_path(path, name), depth + 1)?;
                }
                Ok(())
            }
            Value::Container(container) => {
                for (key, child) in container {
                    self.validate(child, &child_path(path, key), depth + 1)?;
                }
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------
    // Walk
    // ---------------------------------------------------------------

    /// Compare one node, appending differences and returning its combination.
    fn do_calculate(
        &self,
        a: &Value,
        b: &Value,
        path: &str,
        differences: &mut DifferenceCollection,
    ) -> DiffResult<Combination> {
        match (a, b) {
            (Value::Float(_) | Value::Opaque(_), _) => Err(DiffError::UnsupportedType(a.kind())),
            (_, Value::Float(_) | Value::Opaque(_)) => Err(DiffError::UnsupportedType(b.kind())),

            (Value::Null, Value::Null) => Ok(Combination::Value(Value::Null)),
            (Value::Bool(x), Value::Bool(y)) => Ok(compare_scalar(x == y, a, b, path, differences)),
            (Value::Integer(x), Value::Integer(y)) => {
                Ok(compare_scalar(x == y, a, b, path, differences))
            }
            (Value::String(x), Value::String(y)) => {
                Ok(compare_scalar(x == y, a, b, path, differences))
            }

            (Value::Record(x), Value::Record(y)) => {
                let x = record_to_container(x)?;
                let y = record_to_container(y)?;
                self.compare_containers(&x, &y, path, differences)
            }
            (Value::Container(x), Value::Container(y)) => {
                self.compare_containers(x, y, path, differences)
            }

            // Kinds differ.
            _ => Ok(emit(Some(a.clone()), Some(b.clone()), path, differences)),
        }
    }

    /// Compare two containers over the sorted union of their keys.
    fn compare_containers(
        &self,
        a: &Container,
        b: &Container,
        path: &str,
        differences: &mut DifferenceCollection,
    ) -> DiffResult<Combination> {
        let keys: BTreeSet<&Key> = a.keys().chain(b.keys()).collect();
        let mut children = BTreeMap::new();

        for key in keys {
            let key_path = child_path(path, key);
            let child = match (a.get(key), b.get(key)) {
                (Some(x), Some(y)) => self.do_calculate(x, y, &key_path, differences)?,
                (Some(x), None) => emit(Some(x.clone()), None, &key_path, differences),
                (None, Some(y)) => emit(None, Some(y.clone()), &key_path, differences),
                (None, None) => continue,
            };
            children.insert(key.clone(), child);
        }

        Ok(Combination::Nested(children))
    }
}

/// View a plain record as a container keyed by field name.
///
/// This is the only place a record takes container shape.
pub fn record_to_container(record: &Record) -> DiffResult<Container> {
    ensure_plain(record)?;
    Ok(record
        .fields()
        .iter()
        .map(|(name, value)| (Key::from(name.as_str()), value.clone()))
        .collect())
}

fn ensure_plain(record: &Record) -> DiffResult<()> {
    match record.type_name() {
        None => Ok(()),
        Some(type_name) => Err(DiffError::UnsupportedRecord {
            type_name: type_name.to_string(),
        }),
    }
}

fn child_path(path: &str, key: impl std::fmt::Display) -> String {
    format!("{path}.{key}")
}

fn compare_scalar(
    equal: bool,
    a: &Value,
    b: &Value,
    path: &str,
    differences: &mut DifferenceCollection,
) -> Combination {
    if equal {
        Combination::Value(a.clone())
    } else {
        emit(Some(a.clone()), Some(b.clone()), path, differences)
    }
}

fn emit(
    a: Option<Value>,
    b: Option<Value>,
    path: &str,
    differences: &mut DifferenceCollection,
) -> Combination {
    trace!(path, "difference");
    let difference = Difference::new(a, b, path);
    differences.push(difference.clone());
    Combination::Difference(difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn compare(a: serde_json::Value, b: serde_json::Value) -> Comparison {
        Comparator::new(Value::from(a), Value::from(b))
            .calculate()
            .unwrap()
    }

    fn compare_unordered(a: serde_json::Value, b: serde_json::Value) -> Comparison {
        Comparator::new(Value::from(a), Value::from(b))
            .with_config(ComparatorConfig::unordered())
            .calculate()
            .unwrap()
    }

    fn d(a: Option<serde_json::Value>, b: Option<serde_json::Value>, path: &str) -> Difference {
        Difference::new(a.map(Value::from), b.map(Value::from), path)
    }

    // ---------------------------------------------------------------
    // Scalars and kinds
    // ---------------------------------------------------------------

    #[test]
    fn identical_values_are_equal() {
        let value = json!({"a": [1, "x", null, true], "b": {"c": {}}});
        let comparison = compare(value.clone(), value.clone());
        assert!(comparison.is_equal());
        assert!(comparison.differences().is_empty());
    }

    #[test]
    fn equal_scalar_combination_is_the_value() {
        let comparison = compare(json!("same"), json!("same"));
        assert_eq!(comparison.combination(), &Combination::Value(Value::from("same")));
    }

    #[test]
    fn unequal_scalars_yield_one_root_difference() {
        for (a, b) in [
            (json!(1), json!(2)),
            (json!("a"), json!("b")),
            (json!(true), json!(false)),
        ] {
            let comparison = compare(a.clone(), b.clone());
            assert!(!comparison.is_equal());
            assert_eq!(comparison.differences().len(), 1);
            let expected = d(Some(a), Some(b), "$");
            assert_eq!(comparison.differences().get(0), Some(&expected));
            assert_eq!(comparison.combination(), &Combination::Difference(expected));
        }
    }

    #[test]
    fn kind_mismatch_yields_one_root_difference() {
        for (a, b) in [
            (json!(1), json!("1")),
            (json!(null), json!(false)),
            (json!([1]), json!(1)),
            (json!({"a": 1}), json!("a")),
        ] {
            let comparison = compare(a.clone(), b.clone());
            assert_eq!(comparison.differences().len(), 1, "{a} vs {b}");
            let expected = d(Some(a), Some(b), "$");
            assert_eq!(comparison.differences().get(0), Some(&expected));
            assert_eq!(comparison.combination(), &Combination::Difference(expected));
        }
    }

    // ---------------------------------------------------------------
    // Containers
    // ---------------------------------------------------------------

    #[test]
    fn key_union() {
        let comparison = compare(json!({"x": 1, "y": 2}), json!({"y": 2, "z": 3}));

        assert_eq!(comparison.differences().paths(), vec!["$.x", "$.z"]);
        let expected = Combination::Nested(BTreeMap::from([
            (Key::from("x"), d(Some(json!(1)), None, "$.x").into()),
            (Key::from("y"), Value::from(2).into()),
            (Key::from("z"), d(None, Some(json!(3)), "$.z").into()),
        ]));
        assert_eq!(comparison.combination(), &expected);
    }

    #[test]
    fn nested_paths_are_dotted() {
        let comparison = compare(
            json!({"items": [{"name": "a"}, {"name": "b"}, {"name": "c"}]}),
            json!({"items": [{"name": "a"}, {"name": "b"}, {"name": "C"}]}),
        );
        assert_eq!(comparison.differences().paths(), vec!["$.items.2.name"]);
        let leaf = comparison
            .combination()
            .get("items")
            .and_then(|c| c.get(2u64))
            .and_then(|c| c.get("name"))
            .unwrap();
        assert!(leaf.is_difference());
        assert_eq!(
            comparison.combination().get("items").and_then(|c| c.get(0u64)),
            Some(&Combination::Nested(BTreeMap::from([(
                Key::from("name"),
                Value::from("a").into()
            )])))
        );
    }

    #[test]
    fn sibling_differences_are_all_reported() {
        let comparison = compare(
            json!({"a": {"x": 1, "y": 1}, "b": 1, "c": [1]}),
            json!({"a": {"x": 2, "y": 2}, "b": 2, "c": [1, 2]}),
        );
        assert_eq!(
            comparison.differences().paths(),
            vec!["$.a.x", "$.a.y", "$.b", "$.c.1"]
        );
    }

    #[test]
    fn null_valued_key_is_present() {
        let comparison = compare(json!({"k": null}), json!({"k": null}));
        assert!(comparison.is_equal());

        let comparison = compare(json!({"k": null}), json!({}));
        assert_eq!(
            comparison.differences().get(0),
            Some(&d(Some(json!(null)), None, "$.k"))
        );
    }

    #[test]
    fn list_order_matters_by_default() {
        let comparison = compare(json!([1, 2, 3]), json!([3, 1, 2]));
        assert_eq!(comparison.differences().paths(), vec!["$.0", "$.1", "$.2"]);
    }

    #[test]
    fn longer_list_reports_extra_indices() {
        let comparison = compare(json!([1]), json!([1, 2, 3]));
        assert_eq!(comparison.differences().paths(), vec!["$.1", "$.2"]);
        assert_eq!(
            comparison.differences().get(1),
            Some(&d(None, Some(json!(3)), "$.2"))
        );
    }

    #[test]
    fn decimal_object_keys_match_list_indices() {
        let comparison = compare(json!({"0": 1}), json!([1]));
        assert!(comparison.is_equal());

        let comparison = compare(json!({"0": 1, "1": 2}), json!([1, 3]));
        assert_eq!(comparison.differences().paths(), vec!["$.1"]);
        assert_eq!(
            serde_json::to_value(comparison.combination()).unwrap(),
            json!([1, "!>2 -> 3<!"])
        );
    }

    #[test]
    fn paths_name_one_key_each() {
        let comparison = compare(json!({"0": 1, "00": 2}), json!([5]));
        assert_eq!(comparison.differences().paths(), vec!["$.0", "$.00"]);
        assert_eq!(
            serde_json::to_value(comparison.combination()).unwrap(),
            json!({"0": "!>1 -> 5<!", "00": "!>2 -> null<!"})
        );
    }

    #[test]
    fn index_keys_walk_before_name_keys() {
        let a: Container = [(Key::from("name"), Value::from(1)), (Key::Index(0), Value::from(1))]
            .into_iter()
            .collect();
        let b = Container::new();
        let comparison = Comparator::new(a, b).calculate().unwrap();
        assert_eq!(comparison.differences().paths(), vec!["$.0", "$.name"]);
    }

    // ---------------------------------------------------------------
    // Order insensitivity
    // ---------------------------------------------------------------

    #[test]
    fn ignore_array_sorting_makes_permutations_equal() {
        assert!(compare_unordered(json!([1, 2, 3]), json!([3, 1, 2])).is_equal());
        assert!(compare_unordered(
            json!({"tags": ["b", "a"], "rows": [[2, 1], [4, 3]]}),
            json!({"tags": ["a", "b"], "rows": [[3, 4], [1, 2]]})
        )
        .is_equal());
    }

    #[test]
    fn ignore_array_sorting_still_reports_content_changes() {
        let comparison = compare_unordered(json!([1, 2, 3]), json!([1, 2, 4]));
        assert!(!comparison.is_equal());
    }

    #[test]
    fn ignore_array_sorting_option_accessors() {
        let mut comparator = Comparator::new(Value::list([1, 2]), Value::list([2, 1]));
        assert!(!comparator.ignore_array_sorting());
        assert!(!comparator.calculate().unwrap().is_equal());

        comparator.set_ignore_array_sorting(true);
        assert!(comparator.ignore_array_sorting());
        assert!(comparator.calculate().unwrap().is_equal());
    }

    #[test]
    fn canonicalization_leaves_operands_untouched() {
        let comparator = Comparator::new(Value::list([3, 2, 1]), Value::list([1, 2, 3]))
            .with_config(ComparatorConfig::unordered());
        let comparison = comparator.calculate().unwrap();

        assert_eq!(comparator.a(), &Value::list([3, 2, 1]));
        assert_eq!(comparison.a(), comparison.b());
    }

    // ---------------------------------------------------------------
    // Records
    // ---------------------------------------------------------------

    #[test]
    fn plain_records_compare_by_field() {
        let a = Record::plain([("host", Value::from("a")), ("port", Value::from(80))]);
        let b = Record::plain([("host", Value::from("b")), ("port", Value::from(80))]);
        let comparison = Comparator::new(a, b).calculate().unwrap();

        assert_eq!(comparison.differences().paths(), vec!["$.host"]);
        assert_eq!(
            comparison.combination().get("port"),
            Some(&Combination::Value(Value::from(80)))
        );
    }

    #[test]
    fn record_against_container_is_kind_mismatch() {
        let record = Record::plain([("a", 1)]);
        let container = Container::from_iter([("a", 1)]);
        let comparison = Comparator::new(record, container).calculate().unwrap();
        assert_eq!(comparison.differences().paths(), vec!["$"]);
        assert!(comparison.combination().is_difference());
    }

    #[test]
    fn typed_record_is_rejected_anywhere() {
        let typed = Value::from(Record::typed("Connection", [("fd", 3)]));
        let err = Comparator::new(typed.clone(), typed.clone())
            .calculate()
            .unwrap_err();
        assert_eq!(
            err,
            DiffError::UnsupportedRecord {
                type_name: "Connection".into()
            }
        );

        let nested = Value::map([("conn", typed)]);
        let err = Comparator::new(Value::map([("other", 1)]), nested)
            .calculate()
            .unwrap_err();
        assert!(matches!(err, DiffError::UnsupportedRecord { .. }));
    }

    #[test]
    fn record_to_container_keys_by_field_name() {
        let container = record_to_container(&Record::plain([("b", 2), ("a", 1)])).unwrap();
        assert_eq!(
            container.keys().collect::<Vec<_>>(),
            vec![&Key::from("a"), &Key::from("b")]
        );
        assert!(record_to_container(&Record::typed("T", [("a", 1)])).is_err());

        let numbered = record_to_container(&Record::plain([("0", "x")])).unwrap();
        assert!(numbered.is_list_like());
    }

    // ---------------------------------------------------------------
    // Unsupported kinds and limits
    // ---------------------------------------------------------------

    #[test]
    fn float_operand_is_rejected() {
        let err = Comparator::new(Value::from(1.5), Value::from(1))
            .calculate()
            .unwrap_err();
        assert_eq!(err, DiffError::UnsupportedType(vdiff_types::ValueKind::Float));

        let err = Comparator::new(Value::from(1), Value::from(1.5))
            .calculate()
            .unwrap_err();
        assert_eq!(err, DiffError::UnsupportedType(vdiff_types::ValueKind::Float));
    }

    #[test]
    fn nested_unsupported_value_is_rejected_even_on_one_side() {
        // The float only exists under a key missing from `a`.
        let err = Comparator::new(
            Value::from(json!({"x": 1})),
            Value::from(json!({"x": 1, "y": [1, 2.5]})),
        )
        .calculate()
        .unwrap_err();
        assert_eq!(err, DiffError::UnsupportedType(vdiff_types::ValueKind::Float));

        let err = Comparator::new(
            Value::list([Value::Opaque("Socket".into())]),
            Value::list(Vec::<Value>::new()),
        )
        .calculate()
        .unwrap_err();
        assert_eq!(err, DiffError::UnsupportedType(vdiff_types::ValueKind::Opaque));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let deep = json!({"a": {"b": {"c": 1}}});
        let config = ComparatorConfig {
            max_depth: 2,
            ..Default::default()
        };
        let err = Comparator::new(Value::from(deep.clone()), Value::from(deep.clone()))
            .with_config(config)
            .calculate()
            .unwrap_err();
        assert_eq!(
            err,
            DiffError::DepthLimitExceeded {
                limit: 2,
                path: "$.a.b.c".into()
            }
        );

        let config = ComparatorConfig {
            max_depth: 3,
            ..Default::default()
        };
        assert!(Comparator::new(Value::from(deep.clone()), Value::from(deep))
            .with_config(config)
            .calculate()
            .unwrap()
            .is_equal());
    }

    // ---------------------------------------------------------------
    // Properties
    // ---------------------------------------------------------------

    fn arb_json() -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            "[a-z]{0,4}".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::from),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn self_comparison_is_equal(json in arb_json()) {
            let comparison = compare(json.clone(), json);
            prop_assert!(comparison.is_equal());
        }

        #[test]
        fn unequal_integers_differ_at_root(a in any::<i64>(), b in any::<i64>()) {
            prop_assume!(a != b);
            let comparison = compare(json!(a), json!(b));
            prop_assert_eq!(comparison.differences().paths(), vec!["$"]);
        }

        #[test]
        fn differences_are_symmetric_in_count(a in arb_json(), b in arb_json()) {
            let forward = compare(a.clone(), b.clone());
            let backward = compare(b, a);
            prop_assert_eq!(forward.differences().paths(), backward.differences().paths());
        }
    }
}
