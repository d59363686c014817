//! Config infrastructure — loading the stack configuration from disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{self, StackConfig};

/// Default config file location: `~/.streamrig/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
        .map(|home| home.join(".streamrig").join("config.yaml"))
}

/// Load and validate the effective configuration.
///
/// An explicit `--config` path must exist; the default path is optional and
/// falls back to built-in defaults when absent.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if validation
/// fails.
pub fn load_config(explicit: Option<&Path>) -> Result<StackConfig> {
    let cfg = match explicit {
        Some(path) => parse_file(path)?,
        None => {
            let path = default_config_path()?;
            if path.exists() {
                parse_file(&path)?
            } else {
                StackConfig::default()
            }
        }
    };
    config::validate(&cfg)?;
    Ok(cfg)
}

fn parse_file(path: &Path) -> Result<StackConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing config file {}", path.display()))
}

// ── Unit tests ────────────────────────────────────────────────────────────────
