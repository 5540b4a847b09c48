//! Resolve a graph's source and fold its operator list into a single stream.
//!
//! Grounded on `examples/original_source/lib/graph.py`'s `Graph.run`: a
//! named source is looked up in the caller-supplied `inputs` mapping and
//! called once per run; a file source is opened and parsed line by line.
//! Join operators recurse into their right-hand sub-graph with the same
//! `inputs` mapping, in lazy-stream mode.

use crate::graph::{self, Graph, Op, Source};
use crate::ops::{join_op, map_op, reduce_op, sort_op};
use crate::row::Row;
use crate::stream::{boxed, collect_rows, RowStream};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

/// A zero-argument factory producing a fresh row stream; called once per run.
pub type SourceFactory = Arc<dyn Fn() -> RowStream>;

/// Run `graph` to completion and materialize its output.
pub fn run(graph: &Graph, inputs: &HashMap<String, SourceFactory>) -> Result<Vec<Row>> {
    collect_rows(run_lazy(graph, inputs)?)
}

/// Run `graph` and return its output as a lazy stream, without materializing
/// it. Used internally to feed a join's right-hand sub-graph.
pub fn run_lazy(graph: &Graph, inputs: &HashMap<String, SourceFactory>) -> Result<RowStream> {
    let mut stream = resolve_source(graph::source(graph), inputs)?;
    for op in graph::ops(graph) {
        stream = match op {
            Op::Map(mapper) => map_op(Arc::clone(mapper), stream),
            Op::Reduce(reducer, keys) => reduce_op(Arc::clone(reducer), keys.to_vec(), stream)?,
            Op::Sort(keys, config) => sort_op(keys.to_vec(), config.clone(), stream)?,
            Op::Join(joiner, keys, sub_graph) => {
                let right = run_lazy(sub_graph, inputs)?;
                join_op(joiner.clone(), keys.to_vec(), stream, right)?
            }
        };
    }
    Ok(stream)
}

fn resolve_source(source: &Source, inputs: &HashMap<String, SourceFactory>) -> Result<RowStream> {
    match source {
        Source::Named(name) => {
            let factory = inputs
                .get(name)
                .with_context(|| format!("no input registered for source '{name}'"))?;
            Ok(factory())
        }
        Source::File { path, parser } => {
            let file = File::open(path).with_context(|| format!("failed to open source file '{}'", path.display()))?;
            let reader = BufReader::new(file);
            let parser = Arc::clone(parser);
            Ok(boxed(reader.lines().map(move |line| {
                let line = line.context("failed to read line from source file")?;
                parser(&line)
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::LowerCase;
    use crate::stream::rows_from_vec;

    #[test]
    fn named_source_factory_is_called_once_per_run() {
        let graph = Graph::from_iter("lines").map(LowerCase::new("text"));
        let mut inputs: HashMap<String, SourceFactory> = HashMap::new();
        inputs.insert(
            "lines".into(),
            Arc::new(|| rows_from_vec(vec![Row::from_pairs([("text", "HI")])])),
        );
        let out = run(&graph, &inputs).unwrap();
        assert_eq!(out[0].get("text").unwrap().as_str().unwrap(), "hi");
    }

    #[test]
    fn missing_named_source_is_a_source_error() {
        let graph = Graph::from_iter("missing");
        let inputs: HashMap<String, SourceFactory> = HashMap::new();
        assert!(run(&graph, &inputs).is_err());
    }
}
