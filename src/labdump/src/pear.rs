//! Pear dumps: flat big-endian (time, intensity) pairs
//!
//! The body starts at a fixed offset and runs up to the footer. The regions
//! around it are filled with 4-byte sentinel words (72 before, 70 after) and
//! carry no data. Recorders write a sentinel word either as its little-endian
//! value or as the sentinel byte repeated four times; both are recognised.

use tracing::debug;

use crate::axis::{Axis, Label};
use crate::field::{FieldKind, FieldSpec};
use crate::table::DenseTable;
use crate::{Error, Result};

/// Offset of the first (time, intensity) pair
pub const BODY_OFFSET: usize = 0x140;

/// Bytes per (time, intensity) pair
pub const RECORD_SIZE: usize = 8;

/// Header placeholder byte
pub const HEADER_SENTINEL: u8 = 72;

/// Footer placeholder byte
pub const FOOTER_SENTINEL: u8 = 70;

const TIME: FieldSpec = FieldSpec::be(0, FieldKind::U32);
const INTENSITY: FieldSpec = FieldSpec::be(4, FieldKind::U32);

/// One sample of the trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PearRecord {
    pub time: u32,
    pub intensity: u32,
}

/// Width of one sentinel word
const WORD: usize = 4;

/// Sentinel word as written by the recorder (little-endian value)
const SENTINEL_WORD: FieldSpec = FieldSpec::le(0, FieldKind::U32);

/// True if `word` is the sentinel, either as its little-endian value or as
/// four copies of the sentinel byte
fn is_sentinel_word(word: &[u8], sentinel: u8) -> bool {
    word.len() == WORD
        && (word.iter().all(|&b| b == sentinel)
            || SENTINEL_WORD.read_u32(word).is_ok_and(|v| v == u32::from(sentinel)))
}

/// What follows the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footer {
    /// Body runs to EOF
    None,
    /// Trailing 4-byte sentinel words are not part of the body
    Sentinel(u8),
}

impl Default for Footer {
    fn default() -> Self {
        Self::Sentinel(FOOTER_SENTINEL)
    }
}

/// Where the body sits in a pear dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PearLayout {
    pub body_offset: usize,
    pub footer: Footer,
}

impl Default for PearLayout {
    fn default() -> Self {
        Self {
            body_offset: BODY_OFFSET,
            footer: Footer::default(),
        }
    }
}

/// Decode a pear dump, leaving the footer sentinel words out of the body
pub fn decode_pear(data: &[u8]) -> Result<Vec<PearRecord>> {
    decode_pear_with(data, &PearLayout::default())
}

/// Decode a pear dump with an explicit layout
pub fn decode_pear_with(data: &[u8], layout: &PearLayout) -> Result<Vec<PearRecord>> {
    if data.len() < layout.body_offset {
        return Err(Error::OutOfRange {
            offset: layout.body_offset,
            len: 0,
            available: data.len(),
        });
    }

    let end = match layout.footer {
        Footer::None => data.len(),
        Footer::Sentinel(byte) => {
            data.len() - trailing_words(&data[layout.body_offset..], byte) * WORD
        }
    };
    let body = &data[layout.body_offset..end];

    let remaining = body.len() % RECORD_SIZE;
    if remaining != 0 {
        return Err(Error::TruncatedRecord {
            offset: end - remaining,
            record_size: RECORD_SIZE,
            remaining,
        });
    }

    let records = body
        .chunks_exact(RECORD_SIZE)
        .map(|chunk| {
            Ok(PearRecord {
                time: TIME.read_u32(chunk)?,
                intensity: INTENSITY.read_u32(chunk)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(records = records.len(), body_bytes = body.len(), "decoded pear body");
    Ok(records)
}

/// Number of sentinel words at the end of `data`, counted back from EOF
///
/// A slice that does not end on a word boundary has no footer.
fn trailing_words(data: &[u8], sentinel: u8) -> usize {
    if data.len() % WORD != 0 {
        return 0;
    }
    data.chunks_exact(WORD)
        .rev()
        .take_while(|word| is_sentinel_word(word, sentinel))
        .count()
}

/// Number of sentinel words at the start of `data`
fn leading_words(data: &[u8], sentinel: u8) -> usize {
    data.chunks_exact(WORD)
        .take_while(|word| is_sentinel_word(word, sentinel))
        .count()
}

/// Sentinel coverage around the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PearSurvey {
    pub len: usize,
    /// Bytes of leading [`HEADER_SENTINEL`] words
    pub header_sentinels: usize,
    /// Bytes of trailing [`FOOTER_SENTINEL`] words
    pub footer_sentinels: usize,
}

impl PearSurvey {
    /// True when the header placeholder fills everything before the body
    pub fn header_complete(&self) -> bool {
        self.header_sentinels >= BODY_OFFSET
    }
}

/// Measure the sentinel words at either end of a dump
pub fn survey(data: &[u8]) -> PearSurvey {
    let body = data.get(BODY_OFFSET..).unwrap_or_default();
    PearSurvey {
        len: data.len(),
        header_sentinels: leading_words(data, HEADER_SENTINEL) * WORD,
        footer_sentinels: trailing_words(body, FOOTER_SENTINEL) * WORD,
    }
}

/// Decoded pear trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PearTrace {
    pub records: Vec<PearRecord>,
}

impl PearTrace {
    pub fn decode(data: &[u8]) -> Result<Self> {
        Ok(Self {
            records: decode_pear(data)?,
        })
    }

    pub fn into_table(self) -> DenseTable {
        pear_table(&self.records)
    }
}

/// Two-column table (`time`, `intensity`), one row per record
pub fn pear_table(records: &[PearRecord]) -> DenseTable {
    let x_axis = Axis::positions("record", records.len());
    let y_axis = Axis::new("field", vec![Label::from("time"), Label::from("intensity")]);
    let mut table = DenseTable::zeroed(x_axis, y_axis);
    for (row, record) in records.iter().enumerate() {
        table.set(row, 0, f64::from(record.time));
        table.set(row, 1, f64::from(record.intensity));
    }
    table
}
