//! Retry loop: run a command until it exits 0 or the policy says stop.

use super::attempt::Attempt;
use super::classify::NOT_ATTEMPTED;
use super::policy::{RetryDecision, RetryPolicy};
use crate::clock::{Sleeper, ThreadSleeper};
use crate::exec::Executable;
use std::time::Duration;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// An attempt exited 0.
    Success,
    /// Every permitted attempt failed.
    Exhausted,
    /// The policy permitted zero attempts; nothing ran.
    NotAttempted,
}

/// Result of one retry run: the terminal state plus every attempt made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub terminal: Terminal,
    pub attempts: Vec<Attempt>,
}

impl RunOutcome {
    /// 0 on success, the last failing status when exhausted, or
    /// [`NOT_ATTEMPTED`] when nothing ran.
    pub fn exit_status(&self) -> i32 {
        match self.terminal {
            Terminal::Success => 0,
            Terminal::NotAttempted => NOT_ATTEMPTED,
            Terminal::Exhausted => self
                .attempts
                .last()
                .map(|a| a.exit_status)
                .unwrap_or(NOT_ATTEMPTED),
        }
    }

    pub fn spawns(&self) -> usize {
        self.attempts.len()
    }

    /// Delays charged before each attempt, in order (the first is always zero).
    pub fn delays(&self) -> Vec<Duration> {
        self.attempts.iter().map(|a| a.delay_before_run).collect()
    }
}

/// Runs an [`Executable`] under a [`RetryPolicy`], sleeping through a [`Sleeper`].
#[derive(Debug, Clone)]
pub struct RetryRunner<S = ThreadSleeper> {
    policy: RetryPolicy,
    sleeper: S,
}

impl RetryRunner<ThreadSleeper> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, ThreadSleeper)
    }
}

impl<S: Sleeper> RetryRunner<S> {
    pub fn with_sleeper(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn into_sleeper(self) -> S {
        self.sleeper
    }

    /// Execute `cmd` until it exits 0 or `max_tries` attempts have failed.
    pub fn run<E: Executable + ?Sized>(&mut self, cmd: &mut E) -> RunOutcome {
        let max_tries = self.policy.max_tries;
        if max_tries == 0 {
            tracing::warn!(command = %cmd.describe(), "max_tries is 0; command not run");
            return RunOutcome {
                terminal: Terminal::NotAttempted,
                attempts: Vec::new(),
            };
        }

        let mut attempts: Vec<Attempt> = Vec::new();
        let mut delay = Duration::ZERO;
        loop {
            let number = attempts.len() as u32;
            tracing::debug!(
                attempt = number + 1,
                max_tries,
                command = %cmd.describe(),
                "running"
            );
            let exit_status = cmd.run();
            attempts.push(Attempt {
                number,
                delay_before_run: delay,
                exit_status,
            });

            match self.policy.decide(number + 1, exit_status) {
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        "attempt {}/{} of `{}` failed with status {}; retrying in {:?}",
                        number + 1,
                        max_tries,
                        cmd.describe(),
                        exit_status,
                        d
                    );
                    self.sleeper.sleep(d);
                    delay = d;
                }
                RetryDecision::NoRetry if exit_status == 0 => {
                    if number > 0 {
                        tracing::info!(
                            attempts = number + 1,
                            "command succeeded after retries"
                        );
                    }
                    return RunOutcome {
                        terminal: Terminal::Success,
                        attempts,
                    };
                }
                RetryDecision::NoRetry => {
                    tracing::error!(
                        "`{}` failed {} time(s); giving up with status {}",
                        cmd.describe(),
                        max_tries,
                        exit_status
                    );
                    return RunOutcome {
                        terminal: Terminal::Exhausted,
                        attempts,
                    };
                }
            }
        }
    }
}

/// Runs `cmd` under `policy` with real sleeps and returns the final exit status.
pub fn run_with_retry<E: Executable + ?Sized>(policy: &RetryPolicy, cmd: &mut E) -> i32 {
    RetryRunner::new(*policy).run(cmd).exit_status()
}
