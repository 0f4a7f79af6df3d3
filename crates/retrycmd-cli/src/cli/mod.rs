//! CLI for retrycmd.

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use retrycmd_core::{config, logging};
use std::path::PathBuf;

use commands::{run_command, run_config, RetryOverrides};

/// Top-level CLI for retrycmd.
#[derive(Debug, Parser)]
#[command(name = "retrycmd", version)]
#[command(about = "Run a command, retrying with exponential backoff on non-zero exit")]
#[command(long_about = None)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/retrycmd/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More output (-v for debug, -vv for trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a command, retrying on failure. Exits with the command's final status.
    Run {
        /// Maximum number of attempts, including the first (0 = do not run).
        #[arg(long, value_name = "N")]
        tries: Option<u32>,

        /// Delay in seconds before the second attempt; doubles on each retry.
        #[arg(long, value_name = "SECS")]
        delay: Option<f64>,

        /// Upper bound on a single delay, in seconds.
        #[arg(long, value_name = "SECS")]
        max_delay: Option<u64>,

        /// Command and arguments to run (after `--`).
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Print the config file location instead.
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            self.verbose.min(2) as i8
        }
    }

    /// Load config, bring up logging and dispatch. Returns the process exit code.
    pub fn run(self) -> Result<i32> {
        let source = config::config_source(self.config.as_deref())?;
        let cfg = match &source {
            Some(path) => config::load_from(path)?,
            None => config::RetrycmdConfig::default(),
        };
        logging::init_logging(self.verbosity(), cfg.log_file.as_deref())?;
        match &source {
            Some(path) => tracing::debug!("loaded config from {}: {:?}", path.display(), cfg),
            None => tracing::debug!("no config file found; using defaults"),
        }

        match self.command {
            CliCommand::Run {
                tries,
                delay,
                max_delay,
                command,
            } => {
                let overrides = RetryOverrides {
                    tries,
                    delay_secs: delay,
                    max_delay_secs: max_delay,
                };
                run_command(&cfg, &overrides, &command)
            }
            CliCommand::Config { path } => {
                run_config(&cfg, self.config.as_deref(), path)?;
                Ok(0)
            }
        }
    }
}
