//! Operator wrappers: turn a mapper/reducer/joiner into a stream-to-stream
//! transducer, per `SPEC_FULL.md` §4.3.

use crate::grouping::GroupingIterator;
use crate::join_exec::merge_join;
use crate::joiners::Joiner;
use crate::mappers::Mapper;
use crate::reducers::Reducer;
use crate::row::Row;
use crate::sort::{external_sort, SortConfig};
use crate::stream::RowStream;
use anyhow::Result;
use std::sync::Arc;
use std::vec::IntoIter;

/// Map(m). For each input row, emit every row produced by `mapper.apply`.
pub fn map_op(mapper: Arc<dyn Mapper>, input: RowStream) -> RowStream {
    Box::new(MapOp {
        mapper,
        input,
        buffer: Vec::new().into_iter(),
        done: false,
    })
}

struct MapOp {
    mapper: Arc<dyn Mapper>,
    input: RowStream,
    buffer: IntoIter<Row>,
    done: bool,
}

impl Iterator for MapOp {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        loop {
            if let Some(row) = self.buffer.next() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            match self.input.next() {
                Some(Ok(row)) => match self.mapper.apply(row) {
                    Ok(rows) => self.buffer = rows.into_iter(),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    return None;
                }
            }
        }
    }
}

/// Reduce(r, keys). Build a grouping iterator on the input; feed each group
/// to the reducer in turn, emitting its output.
pub fn reduce_op(reducer: Arc<dyn Reducer>, keys: Vec<String>, input: RowStream) -> Result<RowStream> {
    let groups = GroupingIterator::new(input, keys.clone())?;
    Ok(Box::new(ReduceOp {
        groups,
        reducer,
        keys,
        pending: Vec::new().into_iter(),
        done: false,
    }))
}

struct ReduceOp {
    groups: GroupingIterator,
    reducer: Arc<dyn Reducer>,
    keys: Vec<String>,
    pending: IntoIter<Row>,
    done: bool,
}

impl Iterator for ReduceOp {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            if self.done || self.groups.current_keys().is_none() {
                return None;
            }
            let result = {
                let mut group = self.groups.current_group();
                self.reducer.apply(&self.keys, &mut group)
            };
            if let Err(e) = self.groups.advance() {
                self.done = true;
                return Some(Err(e));
            }
            match result {
                Ok(rows) => self.pending = rows.into_iter(),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Sort(keys). See `crate::sort`.
pub fn sort_op(keys: Vec<String>, config: SortConfig, input: RowStream) -> Result<RowStream> {
    external_sort(input, keys, config)
}

/// Join(j, keys). See `crate::join_exec`.
pub fn join_op(joiner: Joiner, keys: Vec<String>, left: RowStream, right: RowStream) -> Result<RowStream> {
    merge_join(keys, joiner, left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::{Filter, LowerCase};
    use crate::reducers::Count;
    use crate::stream::{collect_rows, rows_from_vec};

    #[test]
    fn map_op_applies_mapper_to_every_row() {
        let rows = vec![Row::from_pairs([("text", "HELLO")])];
        let out = collect_rows(map_op(Arc::new(LowerCase::new("text")), rows_from_vec(rows))).unwrap();
        assert_eq!(out[0].get("text").unwrap().as_str().unwrap(), "hello");
    }

    #[test]
    fn map_op_identity_is_a_no_op() {
        struct Identity;
        impl Mapper for Identity {
            fn apply(&self, row: Row) -> Result<Vec<Row>> {
                Ok(vec![row])
            }
        }
        let rows = vec![Row::from_pairs([("a", 1i64)]), Row::from_pairs([("a", 2i64)])];
        let out = collect_rows(map_op(Arc::new(Identity), rows_from_vec(rows.clone()))).unwrap();
        assert_eq!(out, rows);
    }

    #[test]
    fn map_op_filter_can_drop_rows() {
        let rows = vec![Row::from_pairs([("a", 1i64)]), Row::from_pairs([("a", 2i64)])];
        let pred = Filter::new(|r: &Row| r.get("a").unwrap().as_i64().unwrap() == 2);
        let out = collect_rows(map_op(Arc::new(pred), rows_from_vec(rows))).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn reduce_op_groups_every_row_exactly_once() {
        let rows = vec![
            Row::from_pairs([("k", 1i64)]),
            Row::from_pairs([("k", 1i64)]),
            Row::from_pairs([("k", 2i64)]),
        ];
        let out = collect_rows(
            reduce_op(Arc::new(Count::new("n")), vec!["k".into()], rows_from_vec(rows)).unwrap(),
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        let total: i64 = out.iter().map(|r| r.get("n").unwrap().as_i64().unwrap()).sum();
        assert_eq!(total, 3);
    }
}
