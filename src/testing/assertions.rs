//! Row-collection assertions.
//!
//! Grounded on the teacher's `testing::assertions` (`assert_collections_equal`
//! / `assert_collections_unordered_equal`), adapted to `Row`'s multiset
//! equality semantics: column order never matters, and most stock
//! operators make no row-order guarantee unless the graph ends in a sort.

use crate::row::Row;

/// Assert two row sequences are equal element-by-element, in order.
///
/// # Panics
/// Panics (with both sequences rendered) if they differ in length or content.
pub fn assert_rows_eq_ordered(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(a, e, "row mismatch at index {i}:\n  expected: {e:?}\n  actual:   {a:?}");
    }
}

/// Assert two row sequences contain the same rows as multisets (ignoring
/// order, but respecting duplicate counts).
///
/// # Panics
/// Panics (with both sequences rendered) if the multisets differ.
pub fn assert_rows_eq_multiset(actual: &[Row], expected: &[Row]) {
    let mut remaining: Vec<&Row> = expected.iter().collect();
    let mut unmatched: Vec<&Row> = Vec::new();

    for row in actual {
        if let Some(pos) = remaining.iter().position(|r| *r == row) {
            remaining.remove(pos);
        } else {
            unmatched.push(row);
        }
    }

    assert!(
        unmatched.is_empty() && remaining.is_empty(),
        "row multisets differ:\n  missing from actual: {remaining:?}\n  unexpected in actual: {unmatched:?}\n  full expected: {expected:?}\n  full actual: {actual:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn multiset_assertion_ignores_order() {
        let a = vec![Row::from_pairs([("k", Value::Int(1))]), Row::from_pairs([("k", Value::Int(2))])];
        let b = vec![Row::from_pairs([("k", Value::Int(2))]), Row::from_pairs([("k", Value::Int(1))])];
        assert_rows_eq_multiset(&a, &b);
    }

    #[test]
    #[should_panic]
    fn multiset_assertion_respects_duplicate_counts() {
        let a = vec![Row::from_pairs([("k", Value::Int(1))]), Row::from_pairs([("k", Value::Int(1))])];
        let b = vec![Row::from_pairs([("k", Value::Int(1))])];
        assert_rows_eq_multiset(&a, &b);
    }
}
