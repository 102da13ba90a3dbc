use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
use crate::validity::TICK_PERIOD;

/// Retry parameters for API fetches (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds; doubles each retry.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::with_retries(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }
}

/// Global configuration loaded from `~/.config/lms/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LmsConfig {
    /// Base URL of the LMS API, e.g. `https://lms.example.com/api/`.
    pub api_base_url: String,
    /// Total time allowed for one request, in seconds.
    pub request_timeout_secs: u64,
    /// Time allowed to establish a connection, in seconds.
    pub connect_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Countdown refresh interval in milliseconds (None = once per second).
    #[serde(default)]
    pub tick_interval_ms: Option<u64>,
}

impl Default for LmsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            retry: None,
            tick_interval_ms: None,
        }
    }
}

impl LmsConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(TICK_PERIOD)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lms")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LmsConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<LmsConfig> {
    if !path.exists() {
        let default_cfg = LmsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: LmsConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
