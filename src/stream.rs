//! The row stream type and small stream-building helpers.

use crate::row::Row;
use anyhow::Result;

/// A single-pass, lazily produced, fallible sequence of rows.
///
/// Not restartable, not `Clone`, not required to be `Send`/`Sync` — the
/// engine is single-threaded and cooperative (`SPEC_FULL.md` §5). A stream
/// is consumed by pulling one row at a time; every operator in this crate is
/// a function from one (or two) `RowStream`s to a `RowStream`.
pub type RowStream = Box<dyn Iterator<Item = Result<Row>>>;

/// Wrap an already-materialized vector of rows as a `RowStream`. This is the
/// row-model counterpart of the teacher's `from_vec` source helper, and the
/// building block named-source factories typically return.
pub fn rows_from_vec(rows: Vec<Row>) -> RowStream {
    Box::new(rows.into_iter().map(Ok))
}

/// Turn a fallible row iterator into a boxed `RowStream`.
pub fn boxed<I>(iter: I) -> RowStream
where
    I: Iterator<Item = Result<Row>> + 'static,
{
    Box::new(iter)
}

/// Read a `RowStream` to completion into a `Vec`, short-circuiting on the
/// first error.
pub fn collect_rows(stream: RowStream) -> Result<Vec<Row>> {
    stream.collect()
}
