//! Command failure type used before mapping a failure to an exit status.

use std::io;
use thiserror::Error;

/// Why a single command invocation failed.
///
/// The retry loop does not distinguish between these; both are mapped to an
/// exit status via [`CommandError::exit_status`] and retried the same way.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process ran and exited non-zero (or was killed by a signal).
    #[error("`{command}` failed with exit status {status}")]
    NonZeroExitCode { status: i32, command: String },
    /// The process could not be spawned (not found, permission denied, ...).
    #[error("could not execute `{command}`")]
    CouldNotExecute {
        #[source]
        source: io::Error,
        command: String,
    },
}

impl CommandError {
    /// Exit status equivalent of this failure.
    pub fn exit_status(&self) -> i32 {
        match self {
            CommandError::NonZeroExitCode { status, .. } => *status,
            CommandError::CouldNotExecute { source, .. } => {
                super::classify::spawn_failure_status(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zero_exit_keeps_status() {
        let e = CommandError::NonZeroExitCode {
            status: 7,
            command: "false".into(),
        };
        assert_eq!(e.exit_status(), 7);
        assert_eq!(e.to_string(), "`false` failed with exit status 7");
    }

    #[test]
    fn spawn_failure_maps_and_keeps_source() {
        let e = CommandError::CouldNotExecute {
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
            command: "nope".into(),
        };
        assert_eq!(e.exit_status(), 127);
        assert!(std::error::Error::source(&e).is_some());
    }
}
