//! Scalar values and result rows
//!
//! A `Scalar` is a single cell as the engine stores it. Codecs turn domain
//! values into scalars on the way in and back on the way out; the engine
//! never sees anything else.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};

use crate::error::CodecError;

/// A single storable cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Scalar {
    /// Name of the storage class, used in codec mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Integer(_) => "integer",
            Scalar::Real(_) => "real",
            Scalar::Text(_) => "text",
            Scalar::Blob(_) => "blob",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

// =============================================================================
// Engine Conversions
// =============================================================================

impl ToSql for Scalar {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Scalar::Null => ToSqlOutput::Owned(Value::Null),
            Scalar::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Scalar::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Scalar::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Scalar::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl FromSql for Scalar {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Scalar::Null,
            ValueRef::Integer(i) => Scalar::Integer(i),
            ValueRef::Real(f) => Scalar::Real(f),
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Scalar::Text(text.to_string())
            }
            ValueRef::Blob(bytes) => Scalar::Blob(bytes.to_vec()),
        })
    }
}

// =============================================================================
// From Conversions
// =============================================================================

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Real(f)
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(b: Vec<u8>) -> Self {
        Scalar::Blob(b)
    }
}

// =============================================================================
// Native Scalar Types
// =============================================================================

/// Types the engine stores as-is
///
/// These are the types the identity codec accepts. Anything else needs a
/// custom codec or the JSON codec.
pub trait NativeScalar: Sized {
    fn to_scalar(&self) -> Scalar;

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError>;
}

fn mismatch(expected: &str, found: &Scalar) -> CodecError {
    CodecError::new(format!(
        "expected {} column value, found {}",
        expected,
        found.type_name()
    ))
}

impl NativeScalar for Scalar {
    fn to_scalar(&self) -> Scalar {
        self.clone()
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        Ok(scalar)
    }
}

impl NativeScalar for String {
    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.clone())
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl NativeScalar for i64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Integer(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Integer(i) => Ok(i),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl NativeScalar for i32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Integer(i64::from(*self))
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Integer(i) => i32::try_from(i).map_err(CodecError::new),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl NativeScalar for u32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Integer(i64::from(*self))
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Integer(i) => u32::try_from(i).map_err(CodecError::new),
            other => Err(mismatch("integer", &other)),
        }
    }
}

impl NativeScalar for f64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Real(*self)
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Real(f) => Ok(f),
            // SQLite may hand back an integral REAL as INTEGER
            Scalar::Integer(i) => Ok(i as f64),
            other => Err(mismatch("real", &other)),
        }
    }
}

impl NativeScalar for bool {
    fn to_scalar(&self) -> Scalar {
        Scalar::Integer(i64::from(*self))
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Integer(0) => Ok(false),
            Scalar::Integer(1) => Ok(true),
            other => Err(mismatch("boolean (0 or 1)", &other)),
        }
    }
}

impl NativeScalar for Vec<u8> {
    fn to_scalar(&self) -> Scalar {
        Scalar::Blob(self.clone())
    }

    fn from_scalar(scalar: Scalar) -> Result<Self, CodecError> {
        match scalar {
            Scalar::Blob(b) => Ok(b),
            other => Err(mismatch("blob", &other)),
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// One result row: column names paired with their values
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, Scalar)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Scalar)>) -> Self {
        Self { columns }
    }

    /// Value of the named column
    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Move the named column's value out of the row
    pub fn take(&mut self, column: &str) -> Option<Scalar> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| std::mem::replace(value, Scalar::Null))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Rows returned by one statement, in the engine's natural order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
