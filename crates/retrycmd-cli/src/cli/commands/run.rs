//! `retrycmd run -- <command>` – run a command under the retry policy.

use anyhow::{Context, Result};
use retrycmd_core::config::{secs_to_duration, RetrycmdConfig};
use retrycmd_core::exec::CommandLine;
use retrycmd_core::retry::{RetryPolicy, RetryRunner, NOT_ATTEMPTED};
use std::time::Duration;

/// Process exit code used when the policy allowed zero attempts.
pub const EXIT_NOT_ATTEMPTED: i32 = 125;

/// Command-line overrides; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct RetryOverrides {
    pub tries: Option<u32>,
    pub delay_secs: Option<f64>,
    pub max_delay_secs: Option<u64>,
}

/// Merge flags over config over built-in defaults.
pub fn effective_policy(cfg: &RetrycmdConfig, overrides: &RetryOverrides) -> Result<RetryPolicy> {
    let mut policy = cfg.retry_or_default().to_policy()?;
    if let Some(tries) = overrides.tries {
        policy.max_tries = tries;
    }
    if let Some(secs) = overrides.delay_secs {
        policy.initial_delay = secs_to_duration(secs).context("invalid --delay")?;
    }
    if let Some(secs) = overrides.max_delay_secs {
        policy.max_delay = Some(Duration::from_secs(secs));
    }
    Ok(policy)
}

/// Map a run's exit status to a process exit code.
pub fn process_exit_code(status: i32) -> i32 {
    if status == NOT_ATTEMPTED {
        EXIT_NOT_ATTEMPTED
    } else {
        status
    }
}

pub fn run_command(
    cfg: &RetrycmdConfig,
    overrides: &RetryOverrides,
    argv: &[String],
) -> Result<i32> {
    let policy = effective_policy(cfg, overrides)?;
    let mut cmd = CommandLine::from_argv(argv)?;
    tracing::debug!(?policy, command = %cmd, "starting");

    let outcome = RetryRunner::new(policy).run(&mut cmd);
    Ok(process_exit_code(outcome.exit_status()))
}
