//! `retrycmd config` – print the effective configuration or its location.

use anyhow::Result;
use retrycmd_core::config::{self, RetrycmdConfig};
use std::path::Path;

/// Effective config with the retry section filled in from defaults.
pub(crate) fn effective(cfg: &RetrycmdConfig) -> RetrycmdConfig {
    RetrycmdConfig {
        retry: Some(cfg.retry_or_default()),
        log_file: cfg.log_file.clone(),
    }
}

pub fn run_config(cfg: &RetrycmdConfig, explicit: Option<&Path>, path_only: bool) -> Result<()> {
    if path_only {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => config::config_path()?,
        };
        println!("{}", path.display());
        return Ok(());
    }
    print!("{}", toml::to_string_pretty(&effective(cfg))?);
    Ok(())
}
