//! Stock row-local mappers.
//!
//! Grounded on `examples/original_source/lib/operations.py`'s `Mapper`
//! subclasses. Every mapper depends only on the row it is given and emits
//! zero or more rows -- the map operator (`crate::ops`) flattens the results
//! of calling a mapper once per input row.

mod geo;
mod numeric;
mod text;
mod time;

pub use geo::CalculateDistance;
pub use numeric::{InverseFrequency, Product};
pub use text::{Filter, FilterPunctuation, LowerCase, Project, Split};
pub use time::{Hour, Speed, TimeDelta, WeekDay};

use crate::row::Row;
use anyhow::Result;

/// A pure, row-local transform: `row -> 0..N rows`.
pub trait Mapper {
    fn apply(&self, row: Row) -> Result<Vec<Row>>;
}
