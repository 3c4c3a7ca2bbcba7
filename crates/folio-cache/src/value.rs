//! Raw and adapted values.
//!
//! [`RawValue`] is what the backing store hands back for one cell.
//! [`DomainValue`] is the in-memory representation produced from it by a
//! [`crate::adapter::ValueAdapters`] conversion.

use std::fmt;

use chrono::{DateTime, Local};

/// An untyped value as returned by the backing store.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// NULL value.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary data.
    Blob(Vec<u8>),
}

impl RawValue {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Returns true if this value is truthy.
    ///
    /// NULL, zero, the empty string, and the empty blob are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Integer(i) => *i != 0,
            RawValue::Real(f) => *f != 0.0,
            RawValue::Text(s) => !s.is_empty(),
            RawValue::Blob(b) => !b.is_empty(),
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the storage type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Null => "null",
            RawValue::Integer(_) => "integer",
            RawValue::Real(_) => "real",
            RawValue::Text(_) => "text",
            RawValue::Blob(_) => "blob",
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "NULL"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Real(r) => write!(f, "{r}"),
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Integer(v)
    }
}

impl From<i32> for RawValue {
    fn from(v: i32) -> Self {
        RawValue::Integer(i64::from(v))
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Real(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::Text(v)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(v: Vec<u8>) -> Self {
        RawValue::Blob(v)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(RawValue::Null, Into::into)
    }
}

/// An adapted in-memory value.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    /// NULL value.
    Null,
    /// Timezone-aware instant, presented in the process-local zone.
    Timestamp(DateTime<Local>),
    /// Boolean value.
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary data.
    Blob(Vec<u8>),
}

impl DomainValue {
    /// Creates a text value.
    pub fn text(v: impl Into<String>) -> Self {
        DomainValue::Text(v.into())
    }

    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, DomainValue::Null)
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DomainValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the instant if this is a timestamp.
    pub fn as_timestamp(&self) -> Option<&DateTime<Local>> {
        match self {
            DomainValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DomainValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DomainValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number if this is an integer or real.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DomainValue::Integer(i) => Some(*i as f64),
            DomainValue::Real(f) => Some(*f),
            _ => None,
        }
    }
}

/// Identity conversion: every storage class maps to its own variant.
impl From<RawValue> for DomainValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Null => DomainValue::Null,
            RawValue::Integer(i) => DomainValue::Integer(i),
            RawValue::Real(f) => DomainValue::Real(f),
            RawValue::Text(s) => DomainValue::Text(s),
            RawValue::Blob(b) => DomainValue::Blob(b),
        }
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainValue::Null => write!(f, "NULL"),
            DomainValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            DomainValue::Boolean(b) => write!(f, "{b}"),
            DomainValue::Integer(i) => write!(f, "{i}"),
            DomainValue::Real(r) => write!(f, "{r}"),
            DomainValue::Text(s) => write!(f, "{s}"),
            DomainValue::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// One fixed-arity tuple returned by a source query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Vec<RawValue>);

impl Row {
    /// Creates a row from its cells.
    pub fn new(values: Vec<RawValue>) -> Self {
        Self(values)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the cell at `index`.
    pub fn get(&self, index: usize) -> Option<&RawValue> {
        self.0.get(index)
    }

    /// Returns the cells.
    pub fn values(&self) -> &[RawValue] {
        &self.0
    }

    /// Converts into a fixed-size array, or gives the row back if the
    /// column count differs.
    pub fn into_array<const N: usize>(self) -> Result<[RawValue; N], Row> {
        self.0.try_into().map_err(Row)
    }
}

impl From<Vec<RawValue>> for Row {
    fn from(values: Vec<RawValue>) -> Self {
        Self(values)
    }
}
