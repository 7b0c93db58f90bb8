//! strata
//!
//! Layers configuration files, environment variables and explicit overrides,
//! then prints the merged result.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use strata_config::cli::dump::{self, DumpArgs};
use strata_config::cli::get;
use strata_config::cli::{Cli, Command};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter used when `-v` is not given: `RUST_LOG` if set, warnings otherwise.
fn quiet_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        quiet_filter()
    };

    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.load()?;
    debug!(keys = config.len(), "configuration loaded");

    let output = match &cli.command {
        None => dump::render(&config, &DumpArgs::default())?,
        Some(Command::Dump(args)) => dump::render(&config, args)?,
        Some(Command::Get(args)) => get::render(&config, args)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
