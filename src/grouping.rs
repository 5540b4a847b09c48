//! Turn a key-sorted row stream into a sequence of per-key groups.
//!
//! Grounded on `examples/original_source/lib/groups.py`'s `GroupsCreator`:
//! pull one row to seed the first group; a group's sub-stream yields the
//! seed then keeps pulling while the key tuple matches, holding the
//! straddling row as the seed of the next group.

use crate::row::Row;
use crate::stream::RowStream;
use crate::value::Value;
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;

struct State {
    rows: RowStream,
    keys: Vec<String>,
    /// The first row of the group currently being produced, not yet yielded
    /// by its `GroupStream`. `None` once that row has been handed out.
    seed: Option<(Row, Vec<Value>)>,
    /// The row that straddled into the next group, captured while draining
    /// the current one.
    next_seed: Option<(Row, Vec<Value>)>,
    current_keys: Option<Vec<Value>>,
    /// Whether every row of the current group has been accounted for
    /// (either yielded, or captured into `next_seed`/upstream exhaustion).
    group_done: bool,
}

/// A key-sorted row stream, split into contiguous per-key groups.
///
/// Construct with `GroupingIterator::new(rows, keys)`. `current_keys()` and
/// `current_group()` describe the group being produced; `advance()` moves on
/// to the next one. Each upstream row is yielded exactly once across the
/// concatenation of all groups.
pub struct GroupingIterator {
    state: Rc<RefCell<State>>,
}

impl GroupingIterator {
    pub fn new(mut rows: RowStream, keys: Vec<String>) -> Result<Self> {
        let seed = match rows.next() {
            Some(row) => {
                let row = row?;
                let kt = row.key_tuple(&keys)?;
                Some((row, kt))
            }
            None => None,
        };
        let current_keys = seed.as_ref().map(|(_, kt)| kt.clone());
        let group_done = seed.is_none();
        Ok(Self {
            state: Rc::new(RefCell::new(State {
                rows,
                keys,
                seed,
                next_seed: None,
                current_keys,
                group_done,
            })),
        })
    }

    /// The key tuple of the group currently being produced, or `None` if no
    /// groups remain.
    pub fn current_keys(&self) -> Option<Vec<Value>> {
        self.state.borrow().current_keys.clone()
    }

    /// A lazy sub-stream over the rows sharing `current_keys()`.
    pub fn current_group(&self) -> GroupStream {
        GroupStream {
            state: Rc::clone(&self.state),
            done: false,
        }
    }

    /// Exhaust any remainder of the current group and reposition onto the
    /// next one, updating `current_keys` and `current_group`.
    pub fn advance(&mut self) -> Result<()> {
        loop {
            let mut st = self.state.borrow_mut();
            if st.group_done {
                break;
            }
            if st.seed.take().is_some() {
                continue;
            }
            match st.rows.next() {
                Some(Ok(row)) => {
                    let kt = row.key_tuple(&st.keys)?;
                    if Some(&kt) == st.current_keys.as_ref() {
                        continue;
                    }
                    st.next_seed = Some((row, kt));
                    st.group_done = true;
                }
                Some(Err(e)) => {
                    st.group_done = true;
                    return Err(e);
                }
                None => st.group_done = true,
            }
        }

        let mut st = self.state.borrow_mut();
        st.seed = st.next_seed.take();
        st.current_keys = st.seed.as_ref().map(|(_, kt)| kt.clone());
        st.group_done = st.seed.is_none();
        Ok(())
    }
}

/// The row sub-stream for one group. Shares state with its parent
/// [`GroupingIterator`] via `Rc<RefCell<_>>` -- the single-threaded,
/// cooperative execution model (`SPEC_FULL.md` §5) makes this safe and cheap.
pub struct GroupStream {
    state: Rc<RefCell<State>>,
    done: bool,
}

impl Iterator for GroupStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        if self.done {
            return None;
        }
        let mut st = self.state.borrow_mut();

        if let Some((row, _kt)) = st.seed.take() {
            return Some(Ok(row));
        }

        if st.group_done {
            self.done = true;
            return None;
        }

        match st.rows.next() {
            Some(Ok(row)) => {
                let kt = match row.key_tuple(&st.keys) {
                    Ok(kt) => kt,
                    Err(e) => {
                        st.group_done = true;
                        self.done = true;
                        return Some(Err(e));
                    }
                };
                if Some(&kt) == st.current_keys.as_ref() {
                    Some(Ok(row))
                } else {
                    st.next_seed = Some((row, kt));
                    st.group_done = true;
                    self.done = true;
                    None
                }
            }
            Some(Err(e)) => {
                st.group_done = true;
                self.done = true;
                Some(Err(e))
            }
            None => {
                st.group_done = true;
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::rows_from_vec;
    use crate::value::Value;

    fn row(k: i64) -> Row {
        Row::from_pairs([("k", Value::Int(k))])
    }

    #[test]
    fn groups_are_contiguous_runs_and_cover_every_row_once() -> Result<()> {
        let rows = vec![row(1), row(1), row(2), row(2), row(2), row(3)];
        let mut g = GroupingIterator::new(rows_from_vec(rows), vec!["k".into()])?;

        let mut seen = Vec::new();
        let mut group_sizes = Vec::new();
        while g.current_keys().is_some() {
            let group: Vec<Row> = g.current_group().collect::<Result<_>>()?;
            group_sizes.push(group.len());
            for r in &group {
                seen.push(r.get("k").unwrap().as_i64()?);
            }
            g.advance()?;
        }

        assert_eq!(group_sizes, vec![2, 3, 1]);
        assert_eq!(seen, vec![1, 1, 2, 2, 2, 3]);
        Ok(())
    }

    #[test]
    fn empty_upstream_yields_no_groups() -> Result<()> {
        let g = GroupingIterator::new(rows_from_vec(vec![]), vec!["k".into()])?;
        assert!(g.current_keys().is_none());
        Ok(())
    }

    #[test]
    fn partial_group_consumption_skips_remainder_on_advance() -> Result<()> {
        let rows = vec![row(1), row(1), row(1), row(2)];
        let mut g = GroupingIterator::new(rows_from_vec(rows), vec!["k".into()])?;
        // Consume only the first row of the first group.
        let mut first_group = g.current_group();
        first_group.next().unwrap()?;
        drop(first_group);
        g.advance()?;
        assert_eq!(g.current_keys(), Some(vec![Value::Int(2)]));
        Ok(())
    }
}
