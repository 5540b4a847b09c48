//! A small fluent builder for constructing test rows.

use crate::row::Row;
use crate::value::Value;

/// Build a [`Row`] one column at a time.
///
/// ```
/// use compgraph::testing::RowBuilder;
///
/// let row = RowBuilder::new().set("doc_id", 1i64).set("text", "a b a").build();
/// assert_eq!(row.get("text").unwrap().as_str().unwrap(), "a b a");
/// ```
#[derive(Default)]
pub struct RowBuilder {
    row: Row,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self { row: Row::new() }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.row.set(column, value);
        self
    }

    pub fn build(self) -> Row {
        self.row
    }
}
