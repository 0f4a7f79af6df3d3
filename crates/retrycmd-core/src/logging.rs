//! Logging init: always stderr, optionally also appended to a log file.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::Path;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Writer that is either the log file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Default filter directive for a verbosity level (`-q` = -1, default 0, `-v` = 1, `-vv` = 2).
pub fn default_directive(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn,retrycmd=info,retrycmd_core=info",
        1 => "info,retrycmd=debug,retrycmd_core=debug",
        _ => "trace",
    }
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize structured logging to stderr, plus `log_file` when given.
///
/// `RUST_LOG` overrides the verbosity-derived filter. If the log file cannot be
/// opened, logging still comes up on stderr and the failure is reported there.
pub fn init_logging(verbosity: i8, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let (file, file_err) = match log_file.map(|p| (p, open_log_file(p))) {
        Some((_, Ok(f))) => (Some(f), None),
        Some((p, Err(e))) => (None, Some((p.to_path_buf(), e))),
        None => (None, None),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(false);
    let file_layer = file.map(|f| {
        tracing_subscriber::fmt::layer()
            .with_writer(FileMakeWriter(f))
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    match (log_file, file_err) {
        (_, Some((p, e))) => {
            tracing::warn!(
                "could not open log file {}: {}; logging to stderr only",
                p.display(),
                e
            )
        }
        (Some(p), None) => tracing::debug!("logging to {}", p.display()),
        (None, None) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_directives() {
        assert_eq!(default_directive(-1), "error");
        assert!(default_directive(0).contains("retrycmd_core=info"));
        assert!(default_directive(1).contains("retrycmd_core=debug"));
        assert_eq!(default_directive(5), "trace");
    }

    #[test]
    fn directives_parse() {
        for v in [-1, 0, 1, 2] {
            assert!(EnvFilter::try_new(default_directive(v)).is_ok());
        }
    }

    #[test]
    fn log_file_parent_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("retrycmd.log");
        let mut writer = FileMakeWriter(open_log_file(&path).unwrap()).make_writer();
        io::Write::write_all(&mut writer, b"hello\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }
}
