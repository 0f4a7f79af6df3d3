//! The "run this command, observe its exit status" capability.

use crate::retry::classify::{exit_status_code, spawn_failure_status};
use crate::retry::CommandError;
use std::ffi::OsString;
use std::fmt;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Something the retry runner can execute repeatedly.
///
/// Returns the exit status of one execution; 0 means success. Any failure,
/// including failing to start, must be reported as a non-zero status.
pub trait Executable {
    fn run(&mut self) -> i32;

    /// Human-readable form used in diagnostics.
    fn describe(&self) -> String {
        "<command>".to_string()
    }
}

impl<F> Executable for F
where
    F: FnMut() -> i32,
{
    fn run(&mut self) -> i32 {
        self()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgvError {
    #[error("no command given")]
    Empty,
}

/// An external program with its arguments, run with inherited stdio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Build from a full argv (`argv[0]` is the program).
    pub fn from_argv<I, S>(argv: I) -> Result<Self, ArgvError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let program = iter.next().ok_or(ArgvError::Empty)?;
        if program.is_empty() {
            return Err(ArgvError::Empty);
        }
        Ok(Self {
            program,
            args: iter.collect(),
        })
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Spawn, wait, and report any failure as a [`CommandError`].
    pub fn status(&self) -> Result<(), CommandError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| CommandError::CouldNotExecute {
                source,
                command: self.to_string(),
            })?;
        match exit_status_code(status) {
            0 => Ok(()),
            code => Err(CommandError::NonZeroExitCode {
                status: code,
                command: self.to_string(),
            }),
        }
    }
}

impl Executable for CommandLine {
    fn run(&mut self) -> i32 {
        match self.status() {
            Ok(()) => 0,
            Err(CommandError::CouldNotExecute { source, command }) => {
                let status = spawn_failure_status(&source);
                tracing::warn!(%command, status, "could not execute: {}", source);
                status
            }
            Err(e) => {
                tracing::debug!("{}", e);
                e.exit_status()
            }
        }
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", shell_quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

/// Quote a word for display the way a POSIX shell would need it.
fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}
