//! Value model for vdiff.
//!
//! This crate provides the comparable value representation used by the diff
//! engine. Every other vdiff crate depends on `vdiff-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Tagged union of everything the comparator can be handed
//! - [`ValueKind`] -- The type tag of a [`Value`], including unsupported tags
//! - [`Container`] -- Ordered key-value mapping (list-like or map-like)
//! - [`Key`] -- Container key: a non-negative index or a name
//! - [`Record`] -- Field bag built from plain data structs
//! - [`Fingerprint`] -- Domain-separated BLAKE3 digest of a value's canonical JSON

pub mod error;
pub mod fingerprint;
pub mod key;
pub mod record;
pub mod value;

pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use key::Key;
pub use record::{Record, RecordKind};
pub use value::{Container, Value, ValueKind};
