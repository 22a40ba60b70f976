mod cli;
mod commands;
mod config;
mod export;
mod file_utils;

use anyhow::Result;
use clap::Parser;
use config::Config;
use tracing_subscriber::EnvFilter;

use cli::*;

fn init_logging(verbose: bool) {
    let default = if verbose {
        "labdump=debug,labdump_cli=debug"
    } else {
        "labdump=info,labdump_cli=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Configure {
            format,
            output_dir,
            jobs,
            show,
        } => {
            let changes = commands::configure::Changes {
                format,
                output_dir,
                jobs,
            };
            commands::configure::handle(changes, show)?;
        }

        Commands::Decode { command } => {
            let config = Config::load()?;
            commands::decode::handle(command, &config)?;
        }

        Commands::Batch {
            kind,
            dir,
            output,
            output_format,
            jobs,
            strict,
            force,
        } => {
            let config = Config::load()?;
            let options = commands::batch::BatchOptions {
                output_dir: config.output_dir(output),
                format: config.output_format(output_format),
                jobs: config.jobs(jobs),
                sixtysix: commands::sixtysix_options(strict),
                force,
            };
            commands::batch::handle(kind, &dir, &options)?;
        }

        Commands::Inspect { kind, path, json } => {
            commands::inspect::handle(kind, &path, json)?;
        }
    }

    Ok(())
}
