//! Command handlers

pub mod batch;
pub mod configure;
pub mod decode;
pub mod inspect;

use anyhow::{Context, Result};
use labdump::{Consistency, Format, SixtysixOptions};
use std::fs;
use std::path::Path;

use crate::file_utils::SixtysixSample;

/// Read a whole dump file into memory
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Raw buffers of one sample in decode order
///
/// Pear and scale samples are single files; sixtysix samples are directories.
pub fn load_sample(kind: Format, path: &Path) -> Result<Vec<Vec<u8>>> {
    match kind {
        Format::Pear | Format::Scale => Ok(vec![read_input(path)?]),
        Format::Sixtysix => {
            let sample = SixtysixSample::resolve(path)?;
            Ok(vec![read_input(&sample.file_a)?, read_input(&sample.file_b)?])
        }
    }
}

pub fn sixtysix_options(strict: bool) -> SixtysixOptions {
    SixtysixOptions {
        consistency: if strict {
            Consistency::Strict
        } else {
            Consistency::Warn
        },
    }
}
