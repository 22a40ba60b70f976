//! Sixtysix dumps: sparse rows split across an index file and a value file
//!
//! File A is a flat list of 10-byte big-endian index records, one per output
//! row. Each record points at a run of 6-byte little-endian entries in
//! File B. Runs are addressed independently; nothing ties one record's run to
//! the next, so File B is never scanned sequentially.
//!
//! ```text
//! File A record              File B entry
//! +0  u32 BE  offset_b       +0  u16 LE  ylabel
//! +4  u32 BE  xlabel_ms      +2  u32 LE  value
//! +8  u16 BE  nonzero_count
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use tracing::{debug, warn};

use crate::axis::{minutes_from_ms, Axis, Label};
use crate::field::{FieldKind, FieldSpec};
use crate::table::DenseTable;
use crate::{Error, Result};

/// Bytes per File A record
pub const INDEX_RECORD_SIZE: usize = 10;

/// Bytes per File B entry
pub const ENTRY_SIZE: usize = 6;

const OFFSET_B: FieldSpec = FieldSpec::be(0, FieldKind::U32);
const XLABEL_MS: FieldSpec = FieldSpec::be(4, FieldKind::U32);
const NONZERO_COUNT: FieldSpec = FieldSpec::be(8, FieldKind::U16);

const YLABEL: FieldSpec = FieldSpec::le(0, FieldKind::U16);
const VALUE: FieldSpec = FieldSpec::le(2, FieldKind::U32);

/// One File A record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    /// Start of this row's entries in File B
    pub offset_b: u32,
    /// Retention time in milliseconds
    pub xlabel_ms: u32,
    /// Number of File B entries for this row
    pub nonzero_count: u16,
}

impl IndexRecord {
    /// Parse a record from the start of `data`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            offset_b: OFFSET_B.read_u32(data)?,
            xlabel_ms: XLABEL_MS.read_u32(data)?,
            nonzero_count: NONZERO_COUNT.read_u16(data)?,
        })
    }

    /// Encode the record into the first 10 bytes of `buf`
    pub fn write(&self, buf: &mut [u8]) -> Result<()> {
        OFFSET_B.write_u32(buf, self.offset_b)?;
        XLABEL_MS.write_u32(buf, self.xlabel_ms)?;
        NONZERO_COUNT.write_u16(buf, self.nonzero_count)
    }

    /// X-axis label in minutes (4 decimals)
    #[inline]
    pub fn minutes(&self) -> f64 {
        minutes_from_ms(self.xlabel_ms)
    }

    /// Bytes of File B this record claims
    #[inline]
    pub fn region(&self) -> Range<usize> {
        let start = self.offset_b as usize;
        start..start + self.region_len()
    }

    #[inline]
    pub fn region_len(&self) -> usize {
        usize::from(self.nonzero_count) * ENTRY_SIZE
    }
}

/// One non-zero cell recovered from File B
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseEntry {
    pub row: usize,
    pub column: u16,
    pub value: u32,
}

/// Parse every File A record
pub fn parse_index(file_a: &[u8]) -> Result<Vec<IndexRecord>> {
    let remaining = file_a.len() % INDEX_RECORD_SIZE;
    if remaining != 0 {
        return Err(Error::TruncatedRecord {
            offset: file_a.len() - remaining,
            record_size: INDEX_RECORD_SIZE,
            remaining,
        });
    }

    file_a
        .chunks_exact(INDEX_RECORD_SIZE)
        .map(IndexRecord::from_bytes)
        .collect()
}

/// Read the entries one record claims from File B
pub fn read_entries(file_b: &[u8], row: usize, record: &IndexRecord) -> Result<Vec<SparseEntry>> {
    if record.nonzero_count == 0 {
        return Ok(Vec::new());
    }

    let start = record.offset_b as usize;
    let len = record.region_len();
    let region = start
        .checked_add(len)
        .and_then(|end| file_b.get(start..end))
        .ok_or(Error::OutOfRange {
            offset: start,
            len,
            available: file_b.len(),
        })?;

    region
        .chunks_exact(ENTRY_SIZE)
        .map(|chunk| {
            Ok(SparseEntry {
                row,
                column: YLABEL.read_u16(chunk)?,
                value: VALUE.read_u32(chunk)?,
            })
        })
        .collect()
}

/// A record whose File B region starts inside an earlier claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub row: usize,
    pub offset: usize,
    /// Row of the record that already claimed `offset`
    pub claimed_by: usize,
}

/// Agreement between File A's declared counts and File B's extent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseIndexReport {
    /// Sum of `nonzero_count` over all records
    pub declared_entries: usize,
    /// Whole entries File B can hold
    pub file_b_entries: usize,
    pub overlaps: Vec<Overlap>,
    /// File B bytes claimed by no record
    pub unclaimed_bytes: usize,
    /// Unclaimed bytes after the last claimed region
    pub trailing_bytes: usize,
}

impl SparseIndexReport {
    pub fn is_clean(&self) -> bool {
        self.overlaps.is_empty() && self.unclaimed_bytes == 0
    }
}

impl fmt::Display for SparseIndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries declared, File B holds {}; {} overlapping regions, {} unclaimed bytes ({} trailing)",
            self.declared_entries,
            self.file_b_entries,
            self.overlaps.len(),
            self.unclaimed_bytes,
            self.trailing_bytes
        )?;
        if let Some(first) = self.overlaps.first() {
            write!(
                f,
                "; first overlap: row {} at 0x{:x} inside row {}",
                first.row, first.offset, first.claimed_by
            )?;
        }
        Ok(())
    }
}

/// Compare the regions File A claims against the size of File B
///
/// Regions are clipped to `file_b_len`; reading past the end is reported by
/// the join itself.
pub fn check_index(records: &[IndexRecord], file_b_len: usize) -> SparseIndexReport {
    let mut regions: Vec<(usize, usize, usize)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.nonzero_count > 0)
        .map(|(row, r)| {
            let range = r.region();
            (range.start.min(file_b_len), range.end.min(file_b_len), row)
        })
        .collect();
    regions.sort_unstable();

    let mut report = SparseIndexReport {
        declared_entries: records.iter().map(|r| usize::from(r.nonzero_count)).sum(),
        file_b_entries: file_b_len / ENTRY_SIZE,
        ..SparseIndexReport::default()
    };

    let mut covered = 0usize;
    let mut claimed_end = 0usize;
    let mut claimed_by = 0usize;
    for (start, end, row) in regions {
        if start < claimed_end {
            report.overlaps.push(Overlap {
                row,
                offset: start,
                claimed_by,
            });
        }
        if end > claimed_end {
            covered += end - start.max(claimed_end);
            claimed_end = end;
            claimed_by = row;
        }
    }

    report.unclaimed_bytes = file_b_len - covered;
    report.trailing_bytes = file_b_len - claimed_end;
    report
}

/// What to do when File A and File B disagree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    /// Log the report and keep going
    #[default]
    Warn,
    /// Fail with [`Error::CorruptSparseIndex`]
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SixtysixOptions {
    pub consistency: Consistency,
}

/// Table plus the sparse data it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub table: DenseTable,
    pub entries: Vec<SparseEntry>,
    pub report: SparseIndexReport,
}

/// Join File A and File B into a dense table, keeping the intermediate parts
pub fn reconstruct(file_a: &[u8], file_b: &[u8], options: &SixtysixOptions) -> Result<Reconstruction> {
    let records = parse_index(file_a)?;

    let mut entries = Vec::with_capacity(records.iter().map(|r| usize::from(r.nonzero_count)).sum());
    for (row, record) in records.iter().enumerate() {
        entries.extend(read_entries(file_b, row, record)?);
    }

    let report = check_index(&records, file_b.len());
    if !report.is_clean() {
        match options.consistency {
            Consistency::Warn => warn!(%report, "sixtysix index does not cover File B exactly"),
            Consistency::Strict => return Err(Error::CorruptSparseIndex(report.to_string())),
        }
    }

    let columns: BTreeSet<u16> = entries.iter().map(|e| e.column).collect();
    let x_axis = Axis::new(
        "RT (min)",
        records.iter().map(|r| Label::Float(r.minutes())).collect(),
    );
    let y_axis = Axis::new("m/z", columns.into_iter().map(Label::from).collect());

    let mut table = DenseTable::zeroed(x_axis, y_axis);
    let missed = table.apply_sparse(&entries);
    debug_assert_eq!(missed, 0);

    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        entries = entries.len(),
        "reconstructed sixtysix table"
    );

    Ok(Reconstruction {
        table,
        entries,
        report,
    })
}

/// Decode a sixtysix pair, logging any index inconsistency
pub fn decode_sixtysix(file_a: &[u8], file_b: &[u8]) -> Result<DenseTable> {
    decode_sixtysix_with(file_a, file_b, &SixtysixOptions::default())
}

/// Decode a sixtysix pair with an explicit consistency policy
pub fn decode_sixtysix_with(
    file_a: &[u8],
    file_b: &[u8],
    options: &SixtysixOptions,
) -> Result<DenseTable> {
    reconstruct(file_a, file_b, options).map(|r| r.table)
}
