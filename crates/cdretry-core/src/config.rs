use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{PolicyError, RetryPolicy, BASE_DELAY, JITTER_RATIO, MAX_RETRIES};

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per operation (including the first).
    pub max_attempts: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
    /// Upper bound of the random jitter added to each delay, as a ratio (0.0..=0.10).
    pub jitter_ratio: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay_ms: BASE_DELAY.as_millis() as u64,
            jitter_ratio: JITTER_RATIO,
        }
    }
}

impl RetryConfig {
    /// Validate into a policy.
    pub fn to_policy(&self) -> Result<RetryPolicy, PolicyError> {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            self.jitter_ratio,
        )
    }
}

/// Global configuration loaded from `~/.config/cdretry/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdRetryConfig {
    /// Per-request timeout for the HTTP transport, in seconds.
    pub probe_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for CdRetryConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 30,
            retry: None,
        }
    }
}

impl CdRetryConfig {
    /// The configured retry policy, or the default one when `[retry]` is absent.
    pub fn retry_policy(&self) -> Result<RetryPolicy, PolicyError> {
        match &self.retry {
            Some(retry) => retry.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cdretry")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CdRetryConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<CdRetryConfig> {
    if !path.exists() {
        let default_cfg = CdRetryConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: CdRetryConfig = toml::from_str(&data)?;
    // Reject bad retry sections at load time rather than at first use.
    cfg.retry_policy()?;
    Ok(cfg)
}
