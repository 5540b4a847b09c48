use super::Mapper;
use crate::row::Row;
use anyhow::Result;

/// Set `row[out]` to the product of the listed numeric columns.
pub struct Product {
    pub columns: Vec<String>,
    pub out: String,
}

impl Product {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>, out: impl Into<String>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            out: out.into(),
        }
    }
}

impl Mapper for Product {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let mut product = 1.0f64;
        for column in &self.columns {
            product *= row.require(column)?.as_f64()?;
        }
        row.set(self.out.clone(), product);
        Ok(vec![row])
    }
}

/// `row[out] = log(row[num_col] / row[den_col])`.
pub struct InverseFrequency {
    pub num_col: String,
    pub den_col: String,
    pub out: String,
}

impl InverseFrequency {
    pub fn new(num_col: impl Into<String>, den_col: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            num_col: num_col.into(),
            den_col: den_col.into(),
            out: out.into(),
        }
    }
}

impl Mapper for InverseFrequency {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let num = row.require(&self.num_col)?.as_f64()?;
        let den = row.require(&self.den_col)?.as_f64()?;
        row.set(self.out.clone(), (num / den).ln());
        Ok(vec![row])
    }
}
