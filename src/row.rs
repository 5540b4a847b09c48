//! The row type: an unordered, finite mapping from column name to [`Value`].

use crate::value::Value;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// A single table row.
///
/// Column order is never significant; equality is by column set and
/// per-column equality. `BTreeMap` is used (rather than `HashMap`) so rows
/// get a deterministic `Debug` rendering for free, which the `testing`
/// module's row-multiset assertions rely on, and because the hot paths
/// (grouping, sort, join) build key *tuples* by explicit key-list lookup
/// rather than iterating the map in insertion order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.set(k, v);
        }
        row
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// Fetch a required column, with a message naming the operator for `with_context` chaining.
    pub fn require(&self, column: &str) -> Result<&Value> {
        self.0
            .get(column)
            .with_context(|| format!("row is missing required column '{column}'"))
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Project the row onto an ordered key tuple, failing if any key is absent.
    pub fn key_tuple(&self, keys: &[String]) -> Result<Vec<Value>> {
        keys.iter().map(|k| self.require(k).cloned()).collect()
    }

    /// Build a new row containing only `keys` and their current values,
    /// used by reducers that must "echo" the grouping-key columns.
    pub fn project(&self, keys: &[String]) -> Result<Row> {
        let mut out = Row::new();
        for k in keys {
            out.set(k.clone(), self.require(k)?.clone());
        }
        Ok(out)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_order_does_not_affect_equality() {
        let a = Row::from_pairs([("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = Row::from_pairs([("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_key_tuple_column_is_an_error() {
        let row = Row::from_pairs([("a", Value::Int(1))]);
        assert!(row.key_tuple(&["missing".to_string()]).is_err());
    }
}
