//! Map process exit statuses and spawn errors to integer exit statuses.

use std::io;
use std::process::ExitStatus;

/// Status returned when the policy permits zero attempts and nothing ran.
pub const NOT_ATTEMPTED: i32 = -1;

/// Shell convention for "command not found".
pub const STATUS_NOT_FOUND: i32 = 127;

/// Shell convention for "found but not executable".
pub const STATUS_NOT_EXECUTABLE: i32 = 126;

/// Convert a finished process status to an integer exit status.
///
/// On Unix a process killed by signal `n` maps to `128 + n`, as a shell reports it.
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Exit status for a command that could not be spawned.
pub fn spawn_failure_status(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => STATUS_NOT_EXECUTABLE,
        _ => STATUS_NOT_FOUND,
    }
}
