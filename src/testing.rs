//! Testing utilities for graphs built with this crate.
//!
//! Scaled down from the teacher's `testing` module to what the row/stream
//! model needs: row-multiset assertions, a small row builder, and a
//! `TestGraph` wrapper pairing a `Graph` with its named inputs, and
//! stream-inspecting `debug_inspect`/`debug_count` helpers. See
//! `testing::assertions`, `testing::builders`, `testing::debug` and
//! `testing::fixtures`.

pub mod assertions;
pub mod builders;
pub mod debug;
pub mod fixtures;

pub use assertions::{assert_rows_eq_multiset, assert_rows_eq_ordered};
pub use builders::RowBuilder;

use crate::graph::Graph;
use crate::row::Row;
use crate::runner::{self, SourceFactory};
use crate::stream::rows_from_vec;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// A `Graph` paired with its named input datasets, for exercising a graph in
/// tests without hand-wiring a `HashMap<String, SourceFactory>` each time.
///
/// ```
/// use compgraph::mappers::LowerCase;
/// use compgraph::testing::TestGraph;
/// use compgraph::Row;
///
/// let graph = compgraph::Graph::from_iter("lines").map(LowerCase::new("text"));
/// let out = TestGraph::new(graph)
///     .with_input("lines", vec![Row::from_pairs([("text", "HI")])])
///     .run()
///     .unwrap();
/// assert_eq!(out[0].get("text").unwrap().as_str().unwrap(), "hi");
/// ```
pub struct TestGraph {
    graph: Graph,
    inputs: HashMap<String, SourceFactory>,
}

impl TestGraph {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            inputs: HashMap::new(),
        }
    }

    /// Register a named source backed by an in-memory vector. The vector is
    /// cloned on every run, so the source can be read more than once (a join
    /// re-runs its right-hand sub-graph per enclosing run).
    pub fn with_input(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        let factory: SourceFactory = Arc::new(move || rows_from_vec(rows.clone()));
        self.inputs.insert(name.into(), factory);
        self
    }

    pub fn run(&self) -> Result<Vec<Row>> {
        runner::run(&self.graph, &self.inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::LowerCase;

    #[test]
    fn test_graph_wires_named_inputs_without_manual_hashmap() {
        let graph = Graph::from_iter("lines").map(LowerCase::new("text"));
        let out = TestGraph::new(graph)
            .with_input("lines", vec![Row::from_pairs([("text", "HI")])])
            .run()
            .unwrap();
        assert_eq!(out[0].get("text").unwrap().as_str().unwrap(), "hi");
    }
}
