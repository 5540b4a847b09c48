use super::Mapper;
use crate::row::Row;
use crate::value::Value;
use anyhow::Result;
use std::sync::Arc;

fn string_or_default(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::Str(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Strip ASCII punctuation from `column`. Missing column defaults to `""`.
pub struct FilterPunctuation {
    pub column: String,
}

impl FilterPunctuation {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for FilterPunctuation {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let cleaned: String = string_or_default(&row, &self.column)
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        row.set(self.column.clone(), cleaned);
        Ok(vec![row])
    }
}

/// Lowercase `column`. Missing column defaults to `""`.
pub struct LowerCase {
    pub column: String,
}

impl LowerCase {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }
}

impl Mapper for LowerCase {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let lower = string_or_default(&row, &self.column).to_lowercase();
        row.set(self.column.clone(), lower);
        Ok(vec![row])
    }
}

/// Split `column` on `separator` (default: any run of whitespace), emitting
/// one row per token. Missing column defaults to `""` (yields no rows).
pub struct Split {
    pub column: String,
    pub separator: Option<String>,
}

impl Split {
    pub fn new(column: impl Into<String>, separator: Option<String>) -> Self {
        Self {
            column: column.into(),
            separator,
        }
    }
}

impl Mapper for Split {
    fn apply(&self, row: Row) -> Result<Vec<Row>> {
        let text = string_or_default(&row, &self.column);
        let tokens: Vec<&str> = match &self.separator {
            Some(sep) => text.split(sep.as_str()).collect(),
            None => text.split_whitespace().collect(),
        };
        Ok(tokens
            .into_iter()
            .map(|token| {
                let mut new_row = row.clone();
                new_row.set(self.column.clone(), token);
                new_row
            })
            .collect())
    }
}

/// Emit the row iff `predicate(&row)` holds.
pub struct Filter {
    predicate: Arc<dyn Fn(&Row) -> bool>,
}

impl Filter {
    pub fn new(predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }
}

impl Mapper for Filter {
    fn apply(&self, row: Row) -> Result<Vec<Row>> {
        if (self.predicate)(&row) {
            Ok(vec![row])
        } else {
            Ok(vec![])
        }
    }
}

/// Emit a new row containing exactly the listed columns. Fails if any is
/// absent from the input row.
pub struct Project {
    pub columns: Vec<String>,
}

impl Project {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Mapper for Project {
    fn apply(&self, row: Row) -> Result<Vec<Row>> {
        Ok(vec![row.project(&self.columns)?])
    }
}
