//! Decode subcommands

use clap::{Subcommand, ValueEnum};
use labdump::FieldKind;
use std::path::PathBuf;

use super::core::OutputArgs;

#[derive(Subcommand)]
pub enum DecodeCommand {
    /// Decode a pear dump into (time, intensity) rows
    Pear {
        /// Path to the dump
        input: PathBuf,

        /// Decode to EOF, treating footer sentinel words as data
        #[arg(long)]
        keep_footer: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Decode a scale dump into a retention time by wavelength grid
    Scale {
        /// Path to the dump
        input: PathBuf,

        /// Rows carry no retention time; label them by position
        #[arg(long)]
        positional_rows: bool,

        /// Encoding of each row value
        #[arg(long, value_enum, default_value_t = ValueKind::I32)]
        values: ValueKind,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Join a sixtysix File A and File B into a dense grid
    Sixtysix {
        /// Sample directory holding *.A and *.B files
        #[arg(required_unless_present_all = ["file_a", "file_b"])]
        dir: Option<PathBuf>,

        /// File A (index), instead of a sample directory
        #[arg(long = "a", value_name = "FILE", conflicts_with = "dir", requires = "file_b")]
        file_a: Option<PathBuf>,

        /// File B (sparse entries), instead of a sample directory
        #[arg(long = "b", value_name = "FILE", conflicts_with = "dir", requires = "file_a")]
        file_b: Option<PathBuf>,

        /// Fail if the index does not cover File B exactly
        #[arg(long)]
        strict: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Big-endian value encodings a scale row may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    U16,
    U32,
    I32,
    F32,
}

impl From<ValueKind> for FieldKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::U16 => FieldKind::U16,
            ValueKind::U32 => FieldKind::U32,
            ValueKind::I32 => FieldKind::I32,
            ValueKind::F32 => FieldKind::F32,
        }
    }
}
