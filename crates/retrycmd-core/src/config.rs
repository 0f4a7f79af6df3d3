use crate::retry::RetryPolicy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.toml";
const PREFIX: &str = "retrycmd";

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_tries: u32,
    /// Delay in seconds before the second attempt (e.g. 0.5 = 500ms). Doubles each retry.
    pub initial_delay_secs: f64,
    /// Optional cap on a single delay, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delay_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_tries: 5,
            initial_delay_secs: 1.0,
            max_delay_secs: None,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let initial_delay = secs_to_duration(self.initial_delay_secs)
            .context("invalid retry.initial_delay_secs")?;
        Ok(RetryPolicy {
            max_tries: self.max_tries,
            initial_delay,
            max_delay: self.max_delay_secs.map(Duration::from_secs),
        })
    }
}

/// Convert user-supplied seconds to a duration, rejecting negative or non-finite values.
pub fn secs_to_duration(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs < 0.0 {
        bail!("delay must be a finite, non-negative number of seconds (got {secs})");
    }
    Duration::try_from_secs_f64(secs).with_context(|| format!("delay out of range: {secs}"))
}

/// Global configuration loaded from `~/.config/retrycmd/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrycmdConfig {
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    /// Optional log file; diagnostics are appended there in addition to stderr.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl RetrycmdConfig {
    /// Effective retry settings (configured section or defaults).
    pub fn retry_or_default(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }
}

/// Where the default config file lives (it may not exist).
///
/// An existing file anywhere on the XDG config search path wins; otherwise
/// this is the location under `$XDG_CONFIG_HOME` where one would be read from.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(PREFIX)?;
    Ok(xdg_dirs
        .find_config_file(CONFIG_FILE)
        .unwrap_or_else(|| xdg_dirs.get_config_file(CONFIG_FILE)))
}

/// The config file `load` reads: `explicit` if given, else the first file
/// found on the XDG config search path, else `None` (built-in defaults).
pub fn config_source(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        return Ok(Some(p.to_path_buf()));
    }
    let xdg_dirs = xdg::BaseDirectories::with_prefix(PREFIX)?;
    Ok(xdg_dirs.find_config_file(CONFIG_FILE))
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, the XDG config directories are
/// searched and built-in defaults are used when no file is found. No file is
/// ever created.
pub fn load(path: Option<&Path>) -> Result<RetrycmdConfig> {
    match config_source(path)? {
        Some(p) => load_from(&p),
        None => Ok(RetrycmdConfig::default()),
    }
}

pub fn load_from(path: &Path) -> Result<RetrycmdConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: RetrycmdConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = RetrycmdConfig::default();
        assert!(cfg.retry.is_none());
        assert!(cfg.log_file.is_none());
        let retry = cfg.retry_or_default();
        assert_eq!(retry.max_tries, 5);
        assert!((retry.initial_delay_secs - 1.0).abs() < 1e-9);
        assert_eq!(retry.to_policy().unwrap(), RetryPolicy::default());
    }

    #[test]
    fn empty_file_is_default() {
        let cfg: RetrycmdConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, RetrycmdConfig::default());
    }

    #[test]
    fn config_toml_retry_and_log_file() {
        let toml = r#"
            log_file = "/var/log/retrycmd.log"

            [retry]
            max_tries = 3
            initial_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: RetrycmdConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            cfg.log_file.as_deref(),
            Some(Path::new("/var/log/retrycmd.log"))
        );
        let policy = cfg.retry.as_ref().unwrap().to_policy().unwrap();
        assert_eq!(policy.max_tries, 3);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Some(Duration::from_secs(15)));
    }

    #[test]
    fn negative_delay_rejected() {
        let retry = RetryConfig {
            initial_delay_secs: -1.0,
            ..RetryConfig::default()
        };
        assert!(retry.to_policy().is_err());
        assert!(secs_to_duration(f64::NAN).is_err());
        assert!(secs_to_duration(f64::INFINITY).is_err());
        assert_eq!(secs_to_duration(0.0).unwrap(), Duration::ZERO);
    }

    #[test]
    fn unknown_types_fail_to_parse() {
        let toml = r#"
            [retry]
            max_tries = "many"
            initial_delay_secs = 1.0
        "#;
        assert!(toml::from_str::<RetrycmdConfig>(toml).is_err());
    }

    #[test]
    fn load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[retry]\nmax_tries = 2\ninitial_delay_secs = 0.0\n").unwrap();
        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.retry.unwrap().max_tries, 2);
    }

    #[test]
    fn explicit_path_is_the_source() {
        let p = Path::new("/etc/retrycmd/custom.toml");
        assert_eq!(config_source(Some(p)).unwrap().as_deref(), Some(p));
    }

    #[test]
    fn load_missing_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn serialized_defaults_parse_back() {
        let cfg = RetrycmdConfig {
            retry: Some(RetryConfig::default()),
            log_file: None,
        };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("[retry]"));
        assert!(!text.contains("log_file"));
        let parsed: RetrycmdConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }
}
