//! CLI command definitions for strata
//!
//! Global options describe the sources to layer; subcommands decide what to
//! print from the merged result.

pub mod dump;
pub mod get;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dump::DumpArgs;
use get::GetArgs;
use std::path::PathBuf;

use crate::{Config, EnvSource, FileSource, OverrideSource};

/// Merge JSON, YAML and environment configuration and print the result
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file to layer, in order. Prefix with '?' to skip it when missing
    #[arg(short, long, value_name = "PATH", global = true)]
    pub file: Vec<String>,

    /// Import environment variables under this prefix (e.g. APP for APP_SERVER_PORT)
    #[arg(short, long, value_name = "PREFIX", global = true, conflicts_with = "all_env")]
    pub env_prefix: Option<String>,

    /// Import every environment variable
    #[arg(long, global = true)]
    pub all_env: bool,

    /// Explicit override applied last
    #[arg(short, long, value_name = "KEY=VALUE", global = true)]
    pub set: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the merged configuration (default if no subcommand given)
    Dump(DumpArgs),

    /// Print the value of one key
    Get(GetArgs),
}

impl Cli {
    /// Apply the sources named on the command line: files in order, then
    /// the environment, then `--set` overrides.
    pub fn load(&self) -> Result<Config> {
        let mut config = Config::new();

        for file in &self.file {
            let source = match file.strip_prefix('?') {
                Some(path) => FileSource::optional(PathBuf::from(path)),
                None => FileSource::new(PathBuf::from(file)),
            };
            config.add_source(&source)?;
        }

        if self.all_env {
            config.add_source(&EnvSource::new())?;
        } else if let Some(ref prefix) = self.env_prefix {
            config.add_source(&EnvSource::with_prefix(prefix))?;
        }

        let overrides = OverrideSource::parse_pairs(&self.set)?;
        if !overrides.is_empty() {
            config.add_source(&overrides)?;
        }

        Ok(config)
    }
}
