//! Core CLI definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use labdump::Format;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::decode::DecodeCommand;

#[derive(Parser)]
#[command(name = "labdump")]
#[command(about = "Decode pear, scale and sixtysix instrument dumps", long_about = None)]
pub struct Cli {
    /// Log decode progress (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a single sample
    #[command(visible_alias = "d")]
    Decode {
        #[command(subcommand)]
        command: DecodeCommand,
    },

    /// Decode every sample in a directory
    #[command(visible_alias = "b")]
    Batch {
        /// Dump format (pear, scale, sixtysix)
        #[arg(value_name = "FORMAT")]
        kind: Format,

        /// Directory of files (pear, scale) or sample directories (sixtysix)
        dir: PathBuf,

        /// Output directory (uses configured default, then ./solutions)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format
        #[arg(short = 'f', long = "format", value_enum)]
        output_format: Option<OutputFormat>,

        /// Worker threads (uses configured default, then all cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Fail sixtysix samples whose index does not cover File B exactly
        #[arg(long)]
        strict: bool,

        /// Overwrite existing solution files
        #[arg(long)]
        force: bool,
    },

    /// Show header and index facts without exporting
    #[command(visible_alias = "i")]
    Inspect {
        /// Dump format (pear, scale, sixtysix)
        #[arg(value_name = "FORMAT")]
        kind: Format,

        /// Dump file, or sample directory for sixtysix
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default export format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Set default batch output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Set default batch worker count
        #[arg(long)]
        jobs: Option<usize>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// Export format for decoded tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }
}

/// Export options shared by the decode subcommands
#[derive(Args)]
pub struct OutputArgs {
    /// Export format (uses configured default, then csv)
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
