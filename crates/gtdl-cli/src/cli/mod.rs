//! CLI for the gtdl course downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gtdl_core::config;
use std::path::PathBuf;

use commands::{run_download, run_list};

/// Top-level CLI for the gtdl course downloader.
#[derive(Debug, Parser)]
#[command(name = "gtdl")]
#[command(about = "gtdl: course video and notation downloader", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/gtdl/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl the configured course and download all missing lessons.
    Run,

    /// List the course hierarchy without downloading anything.
    List,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run => run_download(&cfg)?,
            CliCommand::List => run_list(&cfg)?,
        }

        Ok(())
    }
}
