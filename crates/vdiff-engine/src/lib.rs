//! Structural comparison engine for vdiff.
//!
//! Compares two nested [`Value`](vdiff_types::Value) trees and produces a
//! flat list of located differences together with a combination tree that
//! mirrors the input structure.
//!
//! # Key Types
//!
//! - [`Comparator`] -- Validates, optionally canonicalizes, and walks two values
//! - [`Comparison`] -- Operands, flattened differences, and the combination tree
//! - [`Difference`] / [`DifferenceRecord`] -- One located mismatch and its structured form
//! - [`DifferenceCollection`] -- Ordered, append-only list of differences
//! - [`Combination`] -- Mirrored tree of shared values and differences
//! - [`ComparatorConfig`] -- Comparison options and the nesting depth bound

pub mod canonical;
pub mod collection;
pub mod combination;
pub mod comparator;
pub mod comparison;
pub mod config;
pub mod difference;
pub mod error;

pub use canonical::{canonicalize, fingerprint};
pub use collection::DifferenceCollection;
pub use combination::Combination;
pub use comparator::{record_to_container, Comparator};
pub use comparison::Comparison;
pub use config::{ComparatorConfig, DEFAULT_MAX_DEPTH, ROOT_PATH};
pub use difference::{Difference, DifferenceRecord};
pub use error::{DiffError, DiffResult};
