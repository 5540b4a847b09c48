//! External sort: a stable sort of a potentially unbounded row stream.
//!
//! Reads input in bounded chunks, sorts each chunk in memory, and spills it
//! to a temporary file once more than one chunk is seen; then performs a
//! k-way merge of the spilled runs using a min-heap keyed on
//! `(key-tuple, run-id)`, where `run-id` breaks ties to preserve stability.
//! When the whole input fits in one chunk, spilling is skipped entirely.

use crate::row::Row;
use crate::stream::RowStream;
use crate::value::Value;
use anyhow::{Context, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};

/// Tuning knobs for [`external_sort`] -- the engine's one piece of runtime
/// configuration.
#[derive(Clone, Debug)]
pub struct SortConfig {
    /// Rows held in memory per chunk before a run is sorted (and, if a
    /// second chunk arrives, spilled).
    pub chunk_rows: usize,
    /// Directory to create spill files in; `None` uses the system temp dir.
    pub spill_dir: Option<PathBuf>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            chunk_rows: 100_000,
            spill_dir: None,
        }
    }
}

/// A key tuple with a total order, for use in `sort`/`BinaryHeap`.
///
/// Component comparison is via [`Value::try_cmp`]; when two rows disagree on
/// a key column's type (an ill-formed input the spec leaves "undefined" for
/// sort, `SPEC_FULL.md` §4.2), comparison falls back to a fixed, consistent
/// order (by value-kind, then by debug rendering) rather than erroring --
/// sort must always produce *some* total order to terminate.
#[derive(Clone, Debug, PartialEq)]
struct SortKey(Vec<Value>);

/// `Value` only has a `PartialEq` impl (floats), but `SortKey::cmp` always
/// produces a total order via the fallback described above, so equality
/// under that order is reflexive in practice.
impl Eq for SortKey {}

fn value_rank(v: &Value) -> u8 {
    match v {
        Value::Int(_) => 0,
        Value::Float(_) => 1,
        Value::Str(_) => 2,
        Value::Geo(..) => 3,
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            match a.try_cmp(b) {
                Ok(Ordering::Equal) => continue,
                Ok(order) => return order,
                Err(_) => {
                    let (ra, rb) = (value_rank(a), value_rank(b));
                    if ra != rb {
                        return ra.cmp(&rb);
                    }
                    return format!("{a:?}").cmp(&format!("{b:?}"));
                }
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// Sort `rows` ascending by `keys`, stably, spilling to disk as needed.
pub fn external_sort(mut rows: RowStream, keys: Vec<String>, config: SortConfig) -> Result<RowStream> {
    let mut runs: Vec<SpillRun> = Vec::new();
    let mut held_chunk: Option<Vec<(SortKey, Row)>> = None;

    loop {
        let chunk = read_chunk(&mut rows, config.chunk_rows, &keys)?;
        if chunk.is_empty() {
            break;
        }
        let mut chunk = chunk;
        chunk.sort_by(|a, b| a.0.cmp(&b.0));

        if runs.is_empty() && held_chunk.is_none() {
            held_chunk = Some(chunk);
            continue;
        }
        if let Some(first) = held_chunk.take() {
            runs.push(spill_run(first, &config)?);
        }
        runs.push(spill_run(chunk, &config)?);
    }

    if runs.is_empty() {
        let sorted = held_chunk.unwrap_or_default();
        return Ok(Box::new(sorted.into_iter().map(|(_, row)| Ok(row))));
    }

    KWayMerge::new(runs, keys).map(|m| Box::new(m) as RowStream)
}

fn read_chunk(
    rows: &mut RowStream,
    chunk_rows: usize,
    keys: &[String],
) -> Result<Vec<(SortKey, Row)>> {
    let mut chunk = Vec::with_capacity(chunk_rows.min(1024));
    for _ in 0..chunk_rows {
        let Some(row) = rows.next() else { break };
        let row = row?;
        let key = SortKey(row.key_tuple(keys)?);
        chunk.push((key, row));
    }
    Ok(chunk)
}

/// One spilled, already-sorted run: a temp file holding length-prefixed
/// `postcard`-encoded rows, in ascending key order.
struct SpillRun {
    file: NamedTempFile,
}

fn spill_run(chunk: Vec<(SortKey, Row)>, config: &SortConfig) -> Result<SpillRun> {
    let mut builder = Builder::new();
    builder.prefix("compgraph-sort-");
    let file = match &config.spill_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .context("failed to create external sort spill file")?;

    {
        let mut writer = BufWriter::new(file.as_file());
        for (_, row) in &chunk {
            write_framed(&mut writer, row)?;
        }
        writer.flush().context("failed to flush spill file")?;
    }

    Ok(SpillRun { file })
}

fn write_framed(writer: &mut impl Write, row: &Row) -> Result<()> {
    let bytes = postcard::to_stdvec(row).context("failed to serialize spilled row")?;
    writer.write_all(&(bytes.len() as u32).to_le_bytes())?;
    writer.write_all(&bytes)?;
    Ok(())
}

fn read_framed(reader: &mut impl Read) -> Result<Option<Row>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e).context("failed to read spill run frame length"),
    }
    let len = u32::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .context("failed to read spill run frame body")?;
    let row = postcard::from_bytes(&buf).context("failed to deserialize spilled row")?;
    Ok(Some(row))
}

/// Wraps the spill file's own handle rather than reopening a second one --
/// a k-way merge over many small runs (e.g. `chunk_rows: 1`) would otherwise
/// hold two file descriptors per run and exhaust the process limit.
struct RunReader {
    reader: BufReader<NamedTempFile>,
}

impl RunReader {
    fn open(mut run: SpillRun) -> Result<Self> {
        run.file.seek(SeekFrom::Start(0)).context("failed to rewind spill run")?;
        Ok(Self {
            reader: BufReader::new(run.file),
        })
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        read_framed(&mut self.reader)
    }
}

struct HeapEntry {
    key: SortKey,
    run_id: usize,
    row: Row,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.run_id == other.run_id
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key).then(self.run_id.cmp(&other.run_id))
    }
}

/// Streaming k-way merge over spilled runs: O(1) resident rows per run plus
/// one min-heap entry each -- the external sort's memory bound.
struct KWayMerge {
    runs: Vec<RunReader>,
    keys: Vec<String>,
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl KWayMerge {
    fn new(spill_runs: Vec<SpillRun>, keys: Vec<String>) -> Result<Self> {
        let mut runs = Vec::with_capacity(spill_runs.len());
        let mut heap = BinaryHeap::new();
        for (run_id, run) in spill_runs.into_iter().enumerate() {
            let mut reader = RunReader::open(run)?;
            if let Some(row) = reader.next_row()? {
                let key = SortKey(row.key_tuple(&keys)?);
                heap.push(Reverse(HeapEntry { key, run_id, row }));
            }
            runs.push(reader);
        }
        Ok(Self { runs, keys, heap })
    }
}

impl Iterator for KWayMerge {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Result<Row>> {
        let Reverse(entry) = self.heap.pop()?;
        match self.runs[entry.run_id].next_row() {
            Ok(Some(row)) => match row.key_tuple(&self.keys) {
                Ok(kt) => self.heap.push(Reverse(HeapEntry {
                    key: SortKey(kt),
                    run_id: entry.run_id,
                    row,
                })),
                Err(e) => return Some(Err(e)),
            },
            Ok(None) => {}
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(entry.row))
    }
}
