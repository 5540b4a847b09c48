use super::Reducer;
use crate::row::Row;
use crate::value::Value;
use anyhow::{bail, Result};

/// Yield the first row of the group only.
pub struct FirstReducer;

impl Reducer for FirstReducer {
    fn apply(&self, _keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>> {
        match rows.next() {
            Some(row) => Ok(vec![row?]),
            None => Ok(vec![]),
        }
    }
}

/// Consume the group, yielding one row with the key columns plus
/// `out = <group size>`.
pub struct Count {
    pub out: String,
}

impl Count {
    pub fn new(out: impl Into<String>) -> Self {
        Self { out: out.into() }
    }
}

impl Reducer for Count {
    fn apply(&self, keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>> {
        let mut count = 0i64;
        let mut key_row = None;
        for row in rows {
            let row = row?;
            if key_row.is_none() {
                key_row = Some(row.project(keys)?);
            }
            count += 1;
        }
        let Some(mut out_row) = key_row else {
            return Ok(vec![]);
        };
        out_row.set(self.out.clone(), count);
        Ok(vec![out_row])
    }
}

/// Sum `col` over the group, yielding one row with the first key column and
/// the sum. Single-key contract, preserved as observed in the original
/// implementation (`SPEC_FULL.md` §9).
pub struct Sum {
    pub col: String,
}

impl Sum {
    pub fn new(col: impl Into<String>) -> Self {
        Self { col: col.into() }
    }
}

impl Reducer for Sum {
    fn apply(&self, keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>> {
        let Some(first_key) = keys.first() else {
            bail!("Sum reducer requires at least one grouping key");
        };
        let mut total = 0.0f64;
        let mut key_value = None;
        for row in rows {
            let row = row?;
            if key_value.is_none() {
                key_value = Some(row.require(first_key)?.clone());
            }
            total += row.require(&self.col)?.as_f64()?;
        }
        let Some(key_value) = key_value else {
            return Ok(vec![]);
        };
        let mut out_row = Row::new();
        out_row.set(first_key.clone(), key_value);
        out_row.set(self.col.clone(), total);
        Ok(vec![out_row])
    }
}

/// Arithmetic mean of `col` over the group, yielding one row with all key
/// columns plus the mean.
pub struct Mean {
    pub col: String,
}

impl Mean {
    pub fn new(col: impl Into<String>) -> Self {
        Self { col: col.into() }
    }
}

impl Reducer for Mean {
    fn apply(&self, keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>> {
        let mut total = 0.0f64;
        let mut count = 0i64;
        let mut key_row = None;
        for row in rows {
            let row = row?;
            if key_row.is_none() {
                key_row = Some(row.project(keys)?);
            }
            total += row.require(&self.col)?.as_f64()?;
            count += 1;
        }
        let Some(mut out_row) = key_row else {
            return Ok(vec![]);
        };
        out_row.set(self.col.clone(), total / count as f64);
        Ok(vec![out_row])
    }
}

/// Count occurrences of each distinct value of `word_col` within the group;
/// emit one row per distinct word with the key columns, `word_col = word`,
/// `out = count_of_word / group_size`.
pub struct TermFrequency {
    pub word_col: String,
    pub out: String,
}

impl TermFrequency {
    pub fn new(word_col: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            word_col: word_col.into(),
            out: out.into(),
        }
    }
}

impl Reducer for TermFrequency {
    fn apply(&self, keys: &[String], rows: &mut dyn Iterator<Item = Result<Row>>) -> Result<Vec<Row>> {
        let mut total = 0i64;
        let mut key_row = None;
        let mut order: Vec<String> = Vec::new();
        let mut counts: Vec<i64> = Vec::new();

        for row in rows {
            let row = row?;
            if key_row.is_none() {
                key_row = Some(row.project(keys)?);
            }
            let word = row.require(&self.word_col)?.as_str()?.to_string();
            total += 1;
            match order.iter().position(|w| w == &word) {
                Some(idx) => counts[idx] += 1,
                None => {
                    order.push(word);
                    counts.push(1);
                }
            }
        }
        let Some(key_row) = key_row else {
            return Ok(vec![]);
        };

        Ok(order
            .into_iter()
            .zip(counts)
            .map(|(word, count)| {
                let mut out_row = key_row.clone();
                out_row.set(self.word_col.clone(), Value::Str(word));
                out_row.set(self.out.clone(), count as f64 / total as f64);
                out_row
            })
            .collect())
    }
}
