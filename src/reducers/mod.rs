//! Stock group-level reducers.
//!
//! Grounded on `examples/original_source/lib/operations.py`'s `Reducer`
//! subclasses. A reducer consumes a group's row stream and the group's key
//! tuple and emits zero or more rows; the reduce operator (`crate::ops`)
//! builds a [`crate::grouping::GroupingIterator`] over its input and feeds
//! each group to the reducer in turn.

mod aggregate;
mod top_n;

pub use aggregate::{Count, FirstReducer, Mean, Sum, TermFrequency};
pub use top_n::{Direction, TopN};

use crate::row::Row;
use anyhow::Result;

/// A group-level aggregator: `(keys, group rows) -> 0..N rows`.
pub trait Reducer {
    fn apply(&self, keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>>;
}
