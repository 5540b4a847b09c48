use super::Mapper;
use crate::row::Row;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;

const FMT_FRACTIONAL: &str = "%Y%m%dT%H%M%S%.f";
const FMT_WHOLE: &str = "%Y%m%dT%H%M%S";

/// Parse `YYYYMMDDTHHMMSS.ffffff`, falling back to `YYYYMMDDTHHMMSS` on
/// failure, per the two accepted timestamp formats.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, FMT_FRACTIONAL)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, FMT_WHOLE))
        .with_context(|| format!("'{raw}' matches neither accepted timestamp format"))
}

/// Three-letter English weekday abbreviation (`Mon`..`Sun`) from a timestamp.
pub struct WeekDay {
    pub date_col: String,
    pub out: String,
}

impl WeekDay {
    pub fn new(date_col: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            date_col: date_col.into(),
            out: out.into(),
        }
    }
}

impl Mapper for WeekDay {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let raw = row.require(&self.date_col)?.as_str()?;
        let ts = parse_timestamp(raw)?;
        let abbrev = &ts.format("%a").to_string()[..3];
        row.set(self.out.clone(), abbrev);
        Ok(vec![row])
    }
}

/// Integer hour 0-23 from a timestamp.
pub struct Hour {
    pub date_col: String,
    pub out: String,
}

impl Hour {
    pub fn new(date_col: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            date_col: date_col.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Hour {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        use chrono::Timelike;
        let raw = row.require(&self.date_col)?.as_str()?;
        let ts = parse_timestamp(raw)?;
        row.set(self.out.clone(), ts.hour() as i64);
        Ok(vec![row])
    }
}

/// `(end - start)` in floating-point seconds.
pub struct TimeDelta {
    pub start: String,
    pub end: String,
    pub out: String,
}

impl TimeDelta {
    pub fn new(start: impl Into<String>, end: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            out: out.into(),
        }
    }
}

impl Mapper for TimeDelta {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let start = parse_timestamp(row.require(&self.start)?.as_str()?)?;
        let end = parse_timestamp(row.require(&self.end)?.as_str()?)?;
        let delta = (end - start).num_microseconds().unwrap_or_default() as f64 / 1_000_000.0;
        row.set(self.out.clone(), delta);
        Ok(vec![row])
    }
}

/// `dist / time * 3600`.
pub struct Speed {
    pub dist: String,
    pub time: String,
    pub out: String,
}

impl Speed {
    pub fn new(dist: impl Into<String>, time: impl Into<String>, out: impl Into<String>) -> Self {
        Self {
            dist: dist.into(),
            time: time.into(),
            out: out.into(),
        }
    }
}

impl Mapper for Speed {
    fn apply(&self, mut row: Row) -> Result<Vec<Row>> {
        let dist = row.require(&self.dist)?.as_f64()?;
        let time = row.require(&self.time)?.as_f64()?;
        row.set(self.out.clone(), dist / time * 3600.0);
        Ok(vec![row])
    }
}
