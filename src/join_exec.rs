//! The merge-join state machine: two grouping iterators over the same key
//! tuple, compared lexicographically and fed to a [`Joiner`] one group at a
//! time.
//!
//! Grounded on `examples/original_source/lib/operations.py`'s
//! `Join.__call__` and `compare_key_values`.

use crate::grouping::GroupingIterator;
use crate::joiners::{merge_both, merge_one_sided, Joiner};
use crate::row::Row;
use crate::stream::RowStream;
use crate::value::compare_tuples;
use anyhow::Result;
use std::cmp::Ordering;
use std::vec::IntoIter;

/// Build the lazy joined stream. Both `left` and `right` must already be
/// sorted ascending on `keys` (`SPEC_FULL.md` §4.5 precondition).
pub fn merge_join(keys: Vec<String>, joiner: Joiner, left: RowStream, right: RowStream) -> Result<RowStream> {
    let left_groups = GroupingIterator::new(left, keys.clone())?;
    let right_groups = GroupingIterator::new(right, keys.clone())?;
    Ok(Box::new(MergeJoin {
        left: left_groups,
        right: right_groups,
        keys,
        joiner,
        pending: Vec::new().into_iter(),
    }))
}

struct MergeJoin {
    left: GroupingIterator,
    right: GroupingIterator,
    keys: Vec<String>,
    joiner: Joiner,
    pending: IntoIter<Row>,
}

impl MergeJoin {
    fn drain_one_sided(&mut self, side_is_left: bool, emit: bool) -> Result<Vec<Row>> {
        let group = if side_is_left {
            self.left.current_group()
        } else {
            self.right.current_group()
        };
        if emit {
            group.map(|r| r.map(|row| merge_one_sided(&row))).collect()
        } else {
            for row in group {
                row?;
            }
            Ok(Vec::new())
        }
    }

    fn step(&mut self) -> Result<Option<Vec<Row>>> {
        match (self.left.current_keys(), self.right.current_keys()) {
            (None, None) => Ok(None),
            (Some(_), None) => {
                let out = self.drain_one_sided(true, self.joiner.emits_left_only())?;
                self.left.advance()?;
                Ok(Some(out))
            }
            (None, Some(_)) => {
                let out = self.drain_one_sided(false, self.joiner.emits_right_only())?;
                self.right.advance()?;
                Ok(Some(out))
            }
            (Some(kl), Some(kr)) => match compare_tuples(&kl, &kr)? {
                Ordering::Equal => {
                    let right_rows: Vec<Row> = self.right.current_group().collect::<Result<_>>()?;
                    let mut out = Vec::new();
                    for row_a in self.left.current_group() {
                        let row_a = row_a?;
                        for row_b in &right_rows {
                            out.push(merge_both(&row_a, row_b, &self.joiner.suffix_a, &self.joiner.suffix_b, &self.keys));
                        }
                    }
                    self.left.advance()?;
                    self.right.advance()?;
                    Ok(Some(out))
                }
                Ordering::Less => {
                    let out = self.drain_one_sided(true, self.joiner.emits_left_only())?;
                    self.left.advance()?;
                    Ok(Some(out))
                }
                Ordering::Greater => {
                    let out = self.drain_one_sided(false, self.joiner.emits_right_only())?;
                    self.right.advance()?;
                    Ok(Some(out))
                }
            },
        }
    }
}

impl Iterator for MergeJoin {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        loop {
            if let Some(row) = self.pending.next() {
                return Some(Ok(row));
            }
            match self.step() {
                Ok(Some(rows)) => self.pending = rows.into_iter(),
                Ok(None) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
