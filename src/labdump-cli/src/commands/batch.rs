//! Parallel decoding of a directory of samples

use anyhow::{bail, Context, Result};
use labdump::{Format, SixtysixOptions};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::load_sample;
use crate::cli::OutputFormat;
use crate::export::write_table;
use crate::file_utils::{collect_files, collect_subdirs, sample_name};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Worker threads; `None` uses one per core
    pub jobs: Option<usize>,
    pub sixtysix: SixtysixOptions,
    /// Overwrite solution files that already exist
    pub force: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub existing: usize,
    pub failed: usize,
}

enum Outcome {
    Written(PathBuf),
    Exists(PathBuf),
}

pub fn handle(kind: Format, dir: &Path, options: &BatchOptions) -> Result<()> {
    let summary = run(kind, dir, options)?;

    println!(
        "Wrote {} solution files to {} ({} already present, {} failed)",
        summary.written,
        options.output_dir.display(),
        summary.existing,
        summary.failed
    );

    if summary.failed > 0 {
        bail!("{} {} samples failed to decode", summary.failed, kind);
    }
    Ok(())
}

/// Decode every sample under `dir` and write one solution file per sample
pub fn run(kind: Format, dir: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    let mut samples = match kind {
        Format::Sixtysix => collect_subdirs(dir)?,
        Format::Pear | Format::Scale => collect_files(dir)?,
    };

    // Samples named for another format are left for that format's batch
    samples.retain(|sample| match Format::from_file_name(&sample_name(sample)) {
        Some(named) if named != kind => {
            debug!("{} looks like a {} sample, skipping", sample.display(), named);
            false
        }
        _ => true,
    });

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            options.output_dir.display()
        )
    })?;

    info!(samples = samples.len(), format = %kind, "decoding {}", dir.display());

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = options.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().context("Failed to start worker pool")?;

    let outcomes: Vec<(&PathBuf, Result<Outcome>)> = pool.install(|| {
        samples
            .par_iter()
            .map(|sample| (sample, process(kind, sample, options)))
            .collect()
    });

    let mut summary = BatchSummary::default();
    for (sample, outcome) in outcomes {
        match outcome {
            Ok(Outcome::Written(path)) => {
                debug!("wrote {}", path.display());
                summary.written += 1;
            }
            Ok(Outcome::Exists(path)) => {
                info!("{} already exists, skipping", path.display());
                summary.existing += 1;
            }
            Err(e) => {
                warn!("skipping {}: {:#}", sample.display(), e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

fn process(kind: Format, sample: &Path, options: &BatchOptions) -> Result<Outcome> {
    let target = options.output_dir.join(format!(
        "{}_solution.{}",
        sample_name(sample),
        options.format.extension()
    ));
    if target.exists() && !options.force {
        return Ok(Outcome::Exists(target));
    }

    let inputs = load_sample(kind, sample)?;
    let slices: Vec<&[u8]> = inputs.iter().map(Vec::as_slice).collect();
    let table = kind
        .decode(&slices, &options.sixtysix)
        .with_context(|| format!("Failed to decode {}", sample.display()))?;

    write_table(&table, options.format, Some(&target))?;
    Ok(Outcome::Written(target))
}
