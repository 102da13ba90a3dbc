//! CLI for the LMS client core.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lms_core::config;
use std::path::Path;

use commands::{run_batches, run_countdown, run_stream, run_users};

/// Top-level CLI for the LMS client.
#[derive(Debug, Parser)]
#[command(name = "lms")]
#[command(about = "LMS client: validity countdowns and batch analytics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the remaining validity of a grant.
    Countdown {
        /// Grant timestamp (RFC 3339, or a naive date-time read as UTC).
        #[arg(long)]
        granted_at: String,
        /// Validity in days from the grant timestamp (may be fractional).
        #[arg(long, allow_negative_numbers = true)]
        validity_days: f64,
        /// Keep ticking and print this many updates (0 = print once).
        #[arg(long, default_value = "0", value_name = "N")]
        ticks: u32,
    },

    /// List batches with their remaining validity.
    Batches,

    /// Show users of a batch as a tree, with per-course validity.
    Users {
        /// Batch identifier.
        batch_id: String,
        /// Expand the courses of this user (repeatable).
        #[arg(long = "expand", value_name = "USERNAME")]
        expand: Vec<String>,
        /// Expand every user.
        #[arg(long)]
        all: bool,
    },

    /// Decode a saved `data:` event stream.
    Stream {
        /// Path to the captured stream body.
        path: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Countdown {
                granted_at,
                validity_days,
                ticks,
            } => run_countdown(&cfg, &granted_at, validity_days, ticks).await?,
            CliCommand::Batches => run_batches(&cfg).await?,
            CliCommand::Users {
                batch_id,
                expand,
                all,
            } => run_users(&cfg, &batch_id, &expand, all).await?,
            CliCommand::Stream { path } => run_stream(Path::new(&path))?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
