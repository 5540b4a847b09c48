//! Joiner strategies and the row-merge helper shared by all of them.
//!
//! Grounded on `examples/original_source/lib/operations.py`'s `Joiner`
//! subclasses and `merge_two_dicts_by_keys`. The empty-row sentinel that
//! implementation used to signal an absent counterpart is replaced here with
//! an explicit "both present" vs "one side only" split, per `SPEC_FULL.md`
//! §9's redesign note: the absent side never needs suffixing, since there is
//! nothing to collide with.

use crate::row::Row;

/// Which merge-join strategy a [`Joiner`] implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

/// A merge-join strategy: decides whether a one-sided key is emitted, and
/// carries the column-suffixing convention used when both sides are present.
#[derive(Clone)]
pub struct Joiner {
    pub kind: JoinKind,
    pub suffix_a: String,
    pub suffix_b: String,
}

impl Joiner {
    pub fn new(kind: JoinKind, suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self {
            kind,
            suffix_a: suffix_a.into(),
            suffix_b: suffix_b.into(),
        }
    }

    pub fn inner(suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self::new(JoinKind::Inner, suffix_a, suffix_b)
    }

    pub fn left(suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self::new(JoinKind::Left, suffix_a, suffix_b)
    }

    pub fn right(suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self::new(JoinKind::Right, suffix_a, suffix_b)
    }

    pub fn outer(suffix_a: impl Into<String>, suffix_b: impl Into<String>) -> Self {
        Self::new(JoinKind::Outer, suffix_a, suffix_b)
    }

    pub fn emits_left_only(&self) -> bool {
        matches!(self.kind, JoinKind::Left | JoinKind::Outer)
    }

    pub fn emits_right_only(&self) -> bool {
        matches!(self.kind, JoinKind::Right | JoinKind::Outer)
    }
}

/// Merge a matched pair of rows under a shared key tuple `keys`. Non-key
/// columns present on both sides are disambiguated with `suffix_a`/`suffix_b`.
pub fn merge_both(a: &Row, b: &Row, suffix_a: &str, suffix_b: &str, keys: &[String]) -> Row {
    let mut merged = Row::new();
    for (col, val) in a.iter() {
        if b.contains(col) && !keys.iter().any(|k| k == col) {
            merged.set(format!("{col}{suffix_a}"), val.clone());
            merged.set(format!("{col}{suffix_b}"), b.get(col).unwrap().clone());
        } else {
            merged.set(col, val.clone());
        }
    }
    for (col, val) in b.iter() {
        let suffixed = format!("{col}{suffix_b}");
        if !merged.contains(col) && !merged.contains(&suffixed) {
            merged.set(col, val.clone());
        }
    }
    merged
}

/// The row for a key present on only one side: no counterpart means no
/// collision, so the row passes through unchanged.
pub fn merge_one_sided(row: &Row) -> Row {
    row.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn colliding_non_key_columns_get_both_suffixes() {
        let a = Row::from_pairs([("k", Value::Int(1)), ("v", Value::Str("x".into()))]);
        let b = Row::from_pairs([("k", Value::Int(1)), ("v", Value::Str("y".into()))]);
        let merged = merge_both(&a, &b, "_a", "_b", &["k".to_string()]);
        assert_eq!(merged.get("v_a").unwrap().as_str().unwrap(), "x");
        assert_eq!(merged.get("v_b").unwrap().as_str().unwrap(), "y");
        assert!(merged.get("v").is_none());
    }

    #[test]
    fn non_colliding_columns_pass_through_unsuffixed() {
        let a = Row::from_pairs([("k", Value::Int(1)), ("a_only", Value::Int(2))]);
        let b = Row::from_pairs([("k", Value::Int(1)), ("b_only", Value::Int(3))]);
        let merged = merge_both(&a, &b, "_a", "_b", &["k".to_string()]);
        assert_eq!(merged.get("a_only").unwrap().as_i64().unwrap(), 2);
        assert_eq!(merged.get("b_only").unwrap().as_i64().unwrap(), 3);
    }

    #[test]
    fn one_sided_merge_is_a_plain_copy() {
        let a = Row::from_pairs([("k", Value::Int(1)), ("a", Value::Str("x".into()))]);
        assert_eq!(merge_one_sided(&a), a);
    }
}
