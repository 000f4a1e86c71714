//! A single located mismatch between two operands.
//!
//! A [`Difference`] renders as `!>` + JSON(a) + ` -> ` + JSON(b) + `<!`. The
//! rendering can be parsed back with [`Difference::from_rendered`], but the
//! split is ambiguous whenever an operand's JSON contains ` -> ` itself, and
//! an absent side renders the same as `null`. [`DifferenceRecord`] is the
//! lossless structured form.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vdiff_types::Value;

use crate::error::{DiffError, DiffResult};

const OPEN_MARKER: &str = "!>";
const CLOSE_MARKER: &str = "<!";
const SEPARATOR: &str = " -> ";

/// One divergence point: the two differing sub-values and where they sit.
///
/// `None` on a side means the key exists only in the other operand.
#[derive(Clone, Debug, PartialEq)]
pub struct Difference {
    a: Option<Value>,
    b: Option<Value>,
    path: String,
}

impl Difference {
    pub fn new(a: Option<Value>, b: Option<Value>, path: impl Into<String>) -> Self {
        Self {
            a,
            b,
            path: path.into(),
        }
    }

    /// The value on the left-hand side, if present there.
    pub fn a(&self) -> Option<&Value> {
        self.a.as_ref()
    }

    /// The value on the right-hand side, if present there.
    pub fn b(&self) -> Option<&Value> {
        self.b.as_ref()
    }

    /// Dotted path from the root marker `$`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Structured `{a, b, path}` form.
    pub fn to_record(&self) -> DifferenceRecord {
        DifferenceRecord {
            a: self.a.clone(),
            b: self.b.clone(),
            path: self.path.clone(),
        }
    }

    /// Render as `!>a -> b<!`, failing if a side cannot be serialized.
    pub fn render(&self) -> DiffResult<String> {
        Ok(format!(
            "{OPEN_MARKER}{}{SEPARATOR}{}{CLOSE_MARKER}",
            render_side(self.a.as_ref())?,
            render_side(self.b.as_ref())?
        ))
    }

    /// Parse a rendering produced by [`Difference::render`].
    ///
    /// The rendering does not carry a path, so the caller supplies it. Both
    /// sides come back present; `null` parses as `Some(Value::Null)`. The
    /// text is split at the last ` -> `.
    pub fn from_rendered(text: &str, path: impl Into<String>) -> DiffResult<Self> {
        let inner = text
            .strip_prefix(OPEN_MARKER)
            .and_then(|t| t.strip_suffix(CLOSE_MARKER))
            .ok_or_else(|| {
                DiffError::MalformedInput(format!(
                    "expected {OPEN_MARKER}...{CLOSE_MARKER} markers in {text:?}"
                ))
            })?;
        let (left, right) = inner
            .rsplit_once(SEPARATOR)
            .filter(|(l, r)| !l.is_empty() && !r.is_empty())
            .ok_or_else(|| {
                DiffError::MalformedInput(format!("expected {SEPARATOR:?} between operands"))
            })?;

        Ok(Self::new(
            Some(parse_side(left)?),
            Some(parse_side(right)?),
            path,
        ))
    }

    /// Parse a rendering from raw bytes, rejecting input that is not text.
    pub fn from_rendered_bytes(bytes: &[u8], path: impl Into<String>) -> DiffResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DiffError::MalformedInput(format!("input is not text: {e}")))?;
        Self::from_rendered(text, path)
    }
}

fn render_side(side: Option<&Value>) -> DiffResult<String> {
    match side {
        Some(value) => Ok(value.to_canonical_json()?),
        None => Ok("null".to_string()),
    }
}

fn parse_side(fragment: &str) -> DiffResult<Value> {
    serde_json::from_str(fragment)
        .map_err(|e| DiffError::MalformedInput(format!("operand {fragment:?}: {e}")))
}

/// Like [`Difference::render`], except that a side which cannot be serialized
/// shows as `<kind>`.
impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{OPEN_MARKER}{}{SEPARATOR}{}{CLOSE_MARKER}",
            display_side(self.a.as_ref()),
            display_side(self.b.as_ref())
        )
    }
}

fn display_side(side: Option<&Value>) -> String {
    match side {
        Some(value) => value
            .to_canonical_json()
            .unwrap_or_else(|_| format!("<{}>", value.kind())),
        None => "null".to_string(),
    }
}

impl Serialize for Difference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.a.is_some()) + usize::from(self.b.is_some());
        let mut state = serializer.serialize_struct("Difference", len)?;
        match &self.a {
            Some(a) => state.serialize_field("a", a)?,
            None => state.skip_field("a")?,
        }
        match &self.b {
            Some(b) => state.serialize_field("b", b)?,
            None => state.skip_field("b")?,
        }
        state.serialize_field("path", &self.path)?;
        state.end()
    }
}

/// The `{a, b, path}` record form of a [`Difference`].
///
/// An absent side is an absent field, so `null` on a side stays
/// `Some(Value::Null)` through a serde round-trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifferenceRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_side"
    )]
    pub a: Option<Value>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_side"
    )]
    pub b: Option<Value>,
    pub path: String,
}

/// A side that appears in the input is present, even when it is `null`.
fn present_side<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl From<DifferenceRecord> for Difference {
    fn from(record: DifferenceRecord) -> Self {
        Self::new(record.a, record.b, record.path)
    }
}

impl From<Difference> for DifferenceRecord {
    fn from(difference: Difference) -> Self {
        Self {
            a: difference.a,
            b: difference.b,
            path: difference.path,
        }
    }
}
