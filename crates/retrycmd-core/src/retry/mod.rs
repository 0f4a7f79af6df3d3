//! Retry and backoff for external commands.
//!
//! Any non-zero exit (including failure to spawn) is retried the same way:
//! the runner sleeps, doubles the delay and tries again until the command
//! exits 0 or the attempt budget is spent.

mod attempt;
pub mod classify;
mod error;
mod policy;
mod run;

pub use attempt::Attempt;
pub use classify::{exit_status_code, spawn_failure_status, NOT_ATTEMPTED};
pub use error::CommandError;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryRunner, RunOutcome, Terminal};
