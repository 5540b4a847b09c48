//! Per-run execution statistics, gated behind the `metrics` feature.
//!
//! Scaled down from the teacher's `MetricsCollector`: this engine has a
//! single execution mode and no persisted state, so there is nothing to
//! register or configure -- just a row counter per named stream stage that
//! the runner can attach around any operator's output, and an optional
//! `serde_json` rendering for saving a run's stats to a file.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::rc::Rc;

use crate::row::Row;
use crate::stream::RowStream;
use anyhow::Result as AnyResult;

/// Row counts collected for one run, keyed by stage label (e.g. `"map:0"`,
/// `"reduce:1"`).
#[derive(Default)]
pub struct RunStats {
    counts: Rc<std::cell::RefCell<BTreeMap<String, u64>>>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `stream` so every row that passes through increments the
    /// counter for `label`.
    pub fn counted(&self, label: impl Into<String>, stream: RowStream) -> RowStream {
        Box::new(CountedStream {
            label: label.into(),
            counts: Rc::clone(&self.counts),
            inner: stream,
        })
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts.borrow().clone()
    }

    #[cfg(feature = "metrics")]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.snapshot())
    }

    #[cfg(feature = "metrics")]
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_json()).context("failed to serialize run stats")?;
        let mut file = File::create(path).context("failed to create metrics file")?;
        file.write_all(json.as_bytes()).context("failed to write metrics file")?;
        Ok(())
    }
}

struct CountedStream {
    label: String,
    counts: Rc<std::cell::RefCell<BTreeMap<String, u64>>>,
    inner: RowStream,
}

impl Iterator for CountedStream {
    type Item = AnyResult<Row>;

    fn next(&mut self) -> Option<AnyResult<Row>> {
        let item = self.inner.next();
        if matches!(item, Some(Ok(_))) {
            *self.counts.borrow_mut().entry(self.label.clone()).or_insert(0) += 1;
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{collect_rows, rows_from_vec};

    #[test]
    fn counted_stream_tracks_rows_that_pass_through() {
        let stats = RunStats::new();
        let rows = vec![Row::from_pairs([("a", 1i64)]), Row::from_pairs([("a", 2i64)])];
        let stream = stats.counted("stage", rows_from_vec(rows));
        collect_rows(stream).unwrap();
        assert_eq!(stats.snapshot().get("stage"), Some(&2));
    }
}
