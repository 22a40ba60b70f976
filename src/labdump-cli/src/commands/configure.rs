//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up labdump defaults.

use crate::cli::OutputFormat;
use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Settings passed to `configure`; `None` leaves a value untouched
#[derive(Debug, Default)]
pub struct Changes {
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
}

impl Changes {
    fn is_empty(&self) -> bool {
        self.format.is_none() && self.output_dir.is_none() && self.jobs.is_none()
    }
}

/// Handle the configure command
///
/// # Arguments
/// * `changes` - Defaults to store
/// * `show` - If true, show current configuration
pub fn handle(changes: Changes, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if changes.is_empty() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, changes);
    config.save()?;

    println!("Configuration updated");
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

fn apply(config: &mut Config, changes: Changes) {
    if let Some(format) = changes.format {
        config.output_format = Some(format);
    }
    if let Some(dir) = changes.output_dir {
        config.output_dir = Some(dir);
    }
    if let Some(jobs) = changes.jobs {
        // 0 clears the setting
        config.jobs = (jobs > 0).then_some(jobs);
    }
}

/// Display current configuration
fn show_config(config: &Config) {
    match config.output_format {
        Some(format) => println!("Output format: {}", format.extension()),
        None => println!("Output format: csv (default)"),
    }

    match &config.output_dir {
        Some(dir) => println!("Output directory: {}", dir.display()),
        None => println!("Output directory: solutions (default)"),
    }

    match config.jobs {
        Some(jobs) => println!("Jobs: {}", jobs),
        None => println!("Jobs: one per core (default)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: labdump configure --format csv|tsv|json");
    println!("   or: labdump configure --output-dir DIR --jobs N");
    println!("   or: labdump configure --show");
}
