//! The heterogeneous value algebra carried by row columns.

use crate::utils::OrdF64;
use anyhow::{bail, Result};
use std::cmp::Ordering;
use std::fmt;

/// A single column value.
///
/// `Value` is the closed set of scalar types a [`crate::row::Row`] column may
/// hold: signed integers, floats, UTF-8 strings, and `(lon, lat)` geo pairs
/// (used by [`crate::mappers::geo::CalculateDistance`]). Values are cheap to
/// clone; the engine never mutates one in place.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    /// `(longitude, latitude)` in degrees.
    Geo(f64, f64),
}

impl Value {
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Int(v) => Ok(*v),
            other => bail!("expected Value::Int, found {other:?}"),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Int(v) => Ok(*v as f64),
            Value::Float(v) => Ok(*v),
            other => bail!("expected a numeric Value, found {other:?}"),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(v) => Ok(v),
            other => bail!("expected Value::Str, found {other:?}"),
        }
    }

    pub fn as_geo(&self) -> Result<(f64, f64)> {
        match self {
            Value::Geo(lon, lat) => Ok((*lon, *lat)),
            other => bail!("expected Value::Geo, found {other:?}"),
        }
    }

    /// Total order within a variant; cross-variant comparison is a logic
    /// error surfaced as `Err` rather than left undefined (see `SPEC_FULL.md`
    /// §7) or panicking across the API boundary.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(OrdF64(*a).cmp(&OrdF64(*b))),
            (Value::Int(a), Value::Float(b)) => Ok(OrdF64(*a as f64).cmp(&OrdF64(*b))),
            (Value::Float(a), Value::Int(b)) => Ok(OrdF64(*a).cmp(&OrdF64(*b as f64))),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Geo(a1, a2), Value::Geo(b1, b2)) => {
                Ok(OrdF64(*a1).cmp(&OrdF64(*b1)).then(OrdF64(*a2).cmp(&OrdF64(*b2))))
            }
            _ => bail!("cannot compare {self:?} with {other:?}: mismatched value types"),
        }
    }
}

/// Lexicographically compare two key tuples, component by component.
///
/// Used by the external sort (to order rows) and the merge-join state
/// machine (to decide which side's group key is "behind").
pub fn compare_tuples(a: &[Value], b: &[Value]) -> Result<Ordering> {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.try_cmp(y)? {
            Ordering::Equal => continue,
            other => return Ok(other),
        }
    }
    Ok(a.len().cmp(&b.len()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Geo(lon, lat) => write!(f, "({lon}, {lat})"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<(f64, f64)> for Value {
    fn from((lon, lat): (f64, f64)) -> Self {
        Value::Geo(lon, lat)
    }
}
