//! CLI argument definitions for labdump
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod decode;

pub use self::core::{Cli, Commands, OutputArgs, OutputFormat};
pub use decode::DecodeCommand;
