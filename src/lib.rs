//! # compgraph
//!
//! A library for building and executing **computational graphs over streams
//! of schemaless rows**. A row is an unordered mapping from string column
//! names to heterogeneous values; a stream is a lazily produced, single-pass
//! sequence of rows. Graphs are composed out of four primitive operators --
//! `map`, `reduce`, `sort`, `join` -- and evaluated against one or more named
//! input streams.
//!
//! ## Core concepts
//!
//! - [`Row`] / [`Value`] -- the row model: an unordered `column -> value` map
//!   over integers, floats, strings, and `(lon, lat)` geo pairs.
//! - [`RowStream`] -- a single-pass, pull-based, fallible row iterator.
//! - [`grouping::GroupingIterator`] -- turns a key-sorted stream into a
//!   sequence of per-key group sub-streams, the protocol `reduce` and `join`
//!   both build on.
//! - [`sort::external_sort`] -- a stable sort with bounded memory, spilling
//!   runs to disk and merging them with a k-way min-heap.
//! - [`mappers`] / [`reducers`] / [`joiners`] -- the stock operator library.
//! - [`Graph`] -- the immutable, chainable pipeline description.
//! - [`runner::run`] -- resolves a graph's sources and executes its operators.
//!
//! ## Quick start
//!
//! ```
//! use compgraph::mappers::{FilterPunctuation, LowerCase, Split};
//! use compgraph::reducers::Count;
//! use compgraph::runner::{run, SourceFactory};
//! use compgraph::{Graph, Row};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let graph = Graph::from_iter("lines")
//!     .map(FilterPunctuation::new("text"))
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text", None))
//!     .sort(["text"])
//!     .reduce(Count::new("count"), ["text"]);
//!
//! let mut inputs: HashMap<String, SourceFactory> = HashMap::new();
//! inputs.insert(
//!     "lines".into(),
//!     Arc::new(|| {
//!         compgraph::stream::rows_from_vec(vec![
//!             Row::from_pairs([("text", "hello, HELLO")]),
//!             Row::from_pairs([("text", "world!")]),
//!         ])
//!     }),
//! );
//!
//! let result = run(&graph, &inputs)?;
//! assert_eq!(result.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod grouping;
pub mod join_exec;
pub mod joiners;
pub mod mappers;
pub mod ops;
pub mod reducers;
pub mod row;
pub mod runner;
pub mod sort;
pub mod stream;
pub mod testing;
pub mod utils;
pub mod value;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use graph::Graph;
pub use row::Row;
pub use stream::RowStream;
pub use value::Value;
