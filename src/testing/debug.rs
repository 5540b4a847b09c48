//! Stream-inspecting debug helpers for use during test execution.
//!
//! Scaled down from the teacher's `testing::debug` (`PCollectionDebugExt`,
//! printing to stderr as elements flow through a pipeline) to the row/stream
//! model: plain functions wrapping a `RowStream` in a pass-through adapter,
//! built on the same counted-stream shape as `metrics::counted`.

use crate::row::Row;
use crate::stream::RowStream;
use anyhow::Result;

/// Wrap `stream` so every row is printed to stderr as `[Debug: label] row`
/// while it passes through. A pass-through -- the returned stream yields the
/// same rows, in the same order, unmodified.
pub fn debug_inspect(label: impl Into<String>, stream: RowStream) -> RowStream {
    Box::new(DebugInspect {
        label: label.into(),
        inner: stream,
    })
}

struct DebugInspect {
    label: String,
    inner: RowStream,
}

impl Iterator for DebugInspect {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        let item = self.inner.next();
        if let Some(Ok(row)) = &item {
            eprintln!("[Debug: {}] {row:?}", self.label);
        }
        item
    }
}

/// Wrap `stream` so the total row count is printed to stderr as
/// `[Debug: label] count: N` once the stream is exhausted.
pub fn debug_count(label: impl Into<String>, stream: RowStream) -> RowStream {
    Box::new(DebugCount {
        label: label.into(),
        inner: stream,
        count: 0,
        reported: false,
    })
}

struct DebugCount {
    label: String,
    inner: RowStream,
    count: u64,
    reported: bool,
}

impl Iterator for DebugCount {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        match self.inner.next() {
            Some(item) => {
                if item.is_ok() {
                    self.count += 1;
                }
                Some(item)
            }
            None => {
                if !self.reported {
                    eprintln!("[Debug: {}] count: {}", self.label, self.count);
                    self.reported = true;
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{collect_rows, rows_from_vec};

    #[test]
    fn debug_inspect_passes_every_row_through_unmodified() {
        let rows = vec![Row::from_pairs([("a", 1i64)]), Row::from_pairs([("a", 2i64)])];
        let out = collect_rows(debug_inspect("stage", rows_from_vec(rows.clone()))).unwrap();
        assert_eq!(out, rows);
    }

    #[test]
    fn debug_count_does_not_alter_the_stream() {
        let rows = vec![Row::from_pairs([("a", 1i64)]), Row::from_pairs([("a", 2i64)])];
        let out = collect_rows(debug_count("stage", rows_from_vec(rows.clone()))).unwrap();
        assert_eq!(out, rows);
    }
}
