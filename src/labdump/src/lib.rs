//! Decoders for laboratory instrument binary dumps
//!
//! Three recorder layouts are understood. Every decoder borrows the raw file
//! bytes and returns a [`DenseTable`] or a structural [`Error`].
//!
//! # Format Overview
//!
//! ## Pear
//!
//! - Bytes 0x000-0x13f: header placeholder (sentinel 0x48)
//! - Bytes 0x140+: big-endian `u32` pairs of (time, intensity)
//! - Trailing footer placeholder: 4-byte words of value 70, not decoded
//!
//! ## Scale
//!
//! - 0x080: divisor (`u16` BE)
//! - 0x100/0x102/0x104: y-axis first, last, step (`u16` BE)
//! - 0x180: row count (`u16` BE)
//! - 0x200+: rows of `"HH"` marker, retention time (`f32` BE), one `i32` BE
//!   per y-axis label
//!
//! ## Sixtysix
//!
//! - File A: 10-byte BE records `{offset_b: u32, xlabel_ms: u32, count: u16}`
//! - File B: 6-byte LE entries `{ylabel: u16, value: u32}` addressed by A
//! - File C: not consumed

pub mod axis;
pub mod field;
mod format;
pub mod pear;
pub mod scale;
pub mod sixtysix;
pub mod table;

// Re-export main types
pub use axis::{minutes_from_ms, y_axis, Axis, Label};
pub use field::{Endian, FieldKind, FieldSpec, Scalar};
pub use format::Format;
pub use pear::{
    decode_pear, decode_pear_with, pear_table, Footer, PearLayout, PearRecord, PearTrace,
};
pub use scale::{decode_scale, decode_scale_with, RowLabel, ScaleHeader, ScaleLayout};
pub use sixtysix::{
    check_index, decode_sixtysix, decode_sixtysix_with, parse_index, reconstruct, Consistency,
    IndexRecord, Reconstruction, SixtysixOptions, SparseEntry, SparseIndexReport,
};
pub use table::{DenseTable, Row, Rows};

/// Errors from instrument dump decoding
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Field out of range: {len} bytes at offset 0x{offset:x}, buffer has {available}")]
    OutOfRange {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("Truncated record at offset 0x{offset:x}: need {record_size} bytes, {remaining} remain")]
    TruncatedRecord {
        offset: usize,
        record_size: usize,
        remaining: usize,
    },

    #[error("Format mismatch at offset 0x{offset:x}: expected 0x{expected:04x}, got 0x{found:04x}")]
    FormatMismatch {
        offset: usize,
        expected: u16,
        found: u16,
    },

    #[error("Division by zero: header divisor is 0")]
    DivisionByZero,

    #[error("Corrupt sparse index: {0}")]
    CorruptSparseIndex(String),

    #[error("Count mismatch for {what}: header declares {declared}, parsed {parsed}")]
    CountMismatch {
        what: &'static str,
        declared: usize,
        parsed: usize,
    },

    #[error("Invalid axis: first={first} last={last} step={step}")]
    InvalidAxis { first: u16, last: u16, step: u16 },

    #[error("Field kind mismatch: expected {expected:?}, spec is {actual:?}")]
    FieldKindMismatch {
        expected: FieldKind,
        actual: FieldKind,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
