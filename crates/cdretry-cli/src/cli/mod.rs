//! CLI for the cdretry classification and backoff engine.

mod commands;

use anyhow::Result;
use cdretry_core::config;
use clap::{Parser, Subcommand};

use commands::{run_classify, run_probe, run_schedule, run_simulate};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cdretry")]
#[command(about = "cdretry: error classification and retry-with-backoff diagnostics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Show the retry class of one or more error codes.
    Classify {
        /// Error codes, e.g. NETWORK_ERROR HTTP_503 VALIDATION_ERROR.
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Print the backoff schedule of the configured policy.
    Schedule {
        /// Seed the jitter so the printed delays are reproducible.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// GET a URL through the retrier. Ctrl-C cancels a pending retry.
    Probe {
        /// HTTP/HTTPS URL to request.
        url: String,
        /// Label used in logs for this operation.
        #[arg(long)]
        label: Option<String>,
    },

    /// Run a scripted operation that fails with CODE a number of times, then succeeds.
    Simulate {
        /// Error code returned by failing attempts.
        code: String,
        /// Number of failing attempts before success.
        #[arg(long, default_value = "2", value_name = "K")]
        failures: u32,
        /// Seed the jitter so delays are reproducible.
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let policy = cfg.retry_policy()?;

        match cli.command {
            CliCommand::Classify { codes } => run_classify(&codes),
            CliCommand::Schedule { seed } => run_schedule(&policy, seed)?,
            CliCommand::Probe { url, label } => {
                run_probe(&policy, &url, label.as_deref(), cfg.probe_timeout()).await?
            }
            CliCommand::Simulate {
                code,
                failures,
                seed,
            } => run_simulate(&policy, &code, failures, seed).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
