//! The immutable, chainable graph description.
//!
//! Grounded on `examples/original_source/lib/graph.py`'s `Graph` class: each
//! chaining method appends an operator record and returns a new graph
//! sharing the rest of its descriptor with its parent.

use crate::joiners::Joiner;
use crate::mappers::Mapper;
use crate::reducers::Reducer;
use crate::row::Row;
use crate::sort::SortConfig;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a graph's input rows come from.
pub enum Source {
    /// A named placeholder resolved at run time from the caller's `inputs` mapping.
    Named(String),
    /// A file with a line parser, opened fresh on every run.
    File {
        path: PathBuf,
        parser: Arc<dyn Fn(&str) -> Result<Row>>,
    },
}

enum OpRecord {
    Map(Arc<dyn Mapper>),
    Reduce(Arc<dyn Reducer>, Vec<String>),
    Sort(Vec<String>, SortConfig),
    Join(Joiner, Vec<String>, Graph),
}

struct GraphInner {
    source: Source,
    ops: Vec<OpRecord>,
}

/// A graph description: an immutable sequence of operator records rooted at
/// a source. Building a graph has no side effects; nothing runs until
/// [`crate::runner::run`] is called.
#[derive(Clone)]
pub struct Graph {
    inner: Arc<GraphInner>,
}

impl Graph {
    /// Declare a named generator source.
    pub fn from_iter(name: impl Into<String>) -> Self {
        Self::rooted(Source::Named(name.into()))
    }

    /// Declare a file source with a line parser.
    pub fn from_file(path: impl Into<PathBuf>, parser: impl Fn(&str) -> Result<Row> + 'static) -> Self {
        Self::rooted(Source::File {
            path: path.into(),
            parser: Arc::new(parser),
        })
    }

    fn rooted(source: Source) -> Self {
        Self {
            inner: Arc::new(GraphInner { source, ops: Vec::new() }),
        }
    }

    fn appended(&self, op: OpRecord) -> Self {
        let mut ops = Vec::with_capacity(self.inner.ops.len() + 1);
        ops.extend(self.inner.ops.iter().map(OpRecord::shallow_clone));
        ops.push(op);
        Self {
            inner: Arc::new(GraphInner {
                source: self.inner.source.shallow_clone(),
                ops,
            }),
        }
    }

    /// Append a map operator.
    pub fn map(&self, mapper: impl Mapper + 'static) -> Self {
        self.appended(OpRecord::Map(Arc::new(mapper)))
    }

    /// Append a reduce operator.
    pub fn reduce(&self, reducer: impl Reducer + 'static, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.appended(OpRecord::Reduce(
            Arc::new(reducer),
            keys.into_iter().map(Into::into).collect(),
        ))
    }

    /// Append a sort operator with the default chunking configuration.
    pub fn sort(&self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sort_with_config(keys, SortConfig::default())
    }

    /// Append a sort operator with an explicit spill-chunk size.
    pub fn sort_with_config(&self, keys: impl IntoIterator<Item = impl Into<String>>, config: SortConfig) -> Self {
        self.appended(OpRecord::Sort(keys.into_iter().map(Into::into).collect(), config))
    }

    /// Append a join that consumes `other` as the right-hand input.
    pub fn join(&self, joiner: Joiner, other: Graph, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.appended(OpRecord::Join(joiner, keys.into_iter().map(Into::into).collect(), other))
    }
}

impl Source {
    fn shallow_clone(&self) -> Source {
        match self {
            Source::Named(name) => Source::Named(name.clone()),
            Source::File { path, parser } => Source::File {
                path: path.clone(),
                parser: Arc::clone(parser),
            },
        }
    }
}

impl OpRecord {
    fn shallow_clone(&self) -> OpRecord {
        match self {
            OpRecord::Map(m) => OpRecord::Map(Arc::clone(m)),
            OpRecord::Reduce(r, keys) => OpRecord::Reduce(Arc::clone(r), keys.clone()),
            OpRecord::Sort(keys, config) => OpRecord::Sort(keys.clone(), config.clone()),
            OpRecord::Join(joiner, keys, graph) => OpRecord::Join(joiner.clone(), keys.clone(), graph.clone()),
        }
    }
}

pub(crate) fn source(graph: &Graph) -> &Source {
    &graph.inner.source
}

pub(crate) enum Op<'a> {
    Map(&'a Arc<dyn Mapper>),
    Reduce(&'a Arc<dyn Reducer>, &'a [String]),
    Sort(&'a [String], &'a SortConfig),
    Join(&'a Joiner, &'a [String], &'a Graph),
}

pub(crate) fn ops(graph: &Graph) -> impl Iterator<Item = Op<'_>> {
    graph.inner.ops.iter().map(|op| match op {
        OpRecord::Map(m) => Op::Map(m),
        OpRecord::Reduce(r, keys) => Op::Reduce(r, keys),
        OpRecord::Sort(keys, config) => Op::Sort(keys, config),
        OpRecord::Join(joiner, keys, sub) => Op::Join(joiner, keys, sub),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::LowerCase;

    #[test]
    fn chaining_does_not_mutate_the_parent_graph() {
        let base = Graph::from_iter("lines");
        let _child = base.map(LowerCase::new("text"));
        assert_eq!(ops(&base).count(), 0);
    }
}
