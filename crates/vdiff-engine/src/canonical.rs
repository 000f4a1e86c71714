//! Content-hash canonical ordering of list-like containers.
//!
//! Lists that hold the same elements in a different order canonicalize to the
//! same value. Elements are not otherwise totally ordered, so each one is
//! ordered by the [`Fingerprint`] of its canonical JSON. Children are
//! canonicalized before their parent so the parent's fingerprints see
//! canonical children.

use vdiff_types::{Container, Fingerprint, Value};

use crate::error::DiffResult;

/// Content fingerprint of a value.
pub fn fingerprint(value: &Value) -> DiffResult<Fingerprint> {
    Ok(Fingerprint::of_value(value)?)
}

/// Canonicalize `value` in place, bottom-up.
///
/// List-like containers are stably sorted by element fingerprint and re-keyed
/// `0..n-1`. Map-like containers and record fields keep their keys but their
/// children are canonicalized. Running this twice changes nothing.
pub fn canonicalize(value: &mut Value) -> DiffResult<()> {
    match value {
        Value::Container(container) => {
            for child in container.values_mut() {
                canonicalize(child)?;
            }
            if container.len() > 1 && container.is_list_like() {
                sort_by_fingerprint(container)?;
            }
        }
        Value::Record(record) => {
            for field in record.fields_mut() {
                canonicalize(field)?;
            }
        }
        Value::Null
        | Value::Bool(_)
        | Value::Integer(_)
        | Value::String(_)
        | Value::Float(_)
        | Value::Opaque(_) => {}
    }
    Ok(())
}

/// Canonicalized copy of `value`.
pub fn canonicalized(value: &Value) -> DiffResult<Value> {
    let mut copy = value.clone();
    canonicalize(&mut copy)?;
    Ok(copy)
}

fn sort_by_fingerprint(container: &mut Container) -> DiffResult<()> {
    let mut keyed = std::mem::take(container)
        .into_values()
        .map(|element| fingerprint(&element).map(|fp| (fp, element)))
        .collect::<DiffResult<Vec<_>>>()?;
    keyed.sort_by(|(x, _), (y, _)| x.cmp(y));
    *container = Container::list(keyed.into_iter().map(|(_, element)| element));
    Ok(())
}
