use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicies;

/// Retry tunables (optional `[retry]` section in config.toml). The backoff
/// shapes are fixed: exponential for unary calls, linear for opening streams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per unary call (including the first).
    pub max_attempts: u32,
    /// Exponential base in seconds: delays are base, 2*base, 4*base, ...
    pub unary_base_delay_secs: f64,
    /// Maximum attempts to open a stream (including the first).
    pub stream_max_attempts: u32,
    /// Linear base in seconds: delays are base, 2*base, 3*base, ...
    pub stream_base_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            unary_base_delay_secs: 2.0,
            stream_max_attempts: 4,
            stream_base_delay_secs: 3.0,
        }
    }
}

/// Global configuration loaded from `~/.config/microbank/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrobankConfig {
    /// Host of the bank / fault-injection gRPC server.
    pub host: String,
    pub port: u16,
    /// Deadline for one logical operation, covering every retry attempt.
    pub deadline_secs: u64,
    /// Timeout for establishing the TCP/HTTP2 connection.
    pub connect_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for MicrobankConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9090,
            deadline_secs: 50,
            connect_timeout_secs: 5,
            retry: None,
        }
    }
}

impl MicrobankConfig {
    pub fn endpoint_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn retry_policies(&self) -> RetryPolicies {
        self.retry
            .as_ref()
            .map(RetryPolicies::from_config)
            .unwrap_or_default()
    }

    /// Apply `MICROBANK_HOST` / `MICROBANK_PORT` values, if set.
    pub fn apply_overrides(&mut self, host: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("MICROBANK_PORT is not a valid port: {port:?}"))?;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(
            std::env::var("MICROBANK_HOST").ok(),
            std::env::var("MICROBANK_PORT").ok(),
        )
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("microbank")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied on top.
pub fn load_or_init() -> Result<MicrobankConfig> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        read(&path)?
    } else {
        let default_cfg = MicrobankConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    };
    cfg.apply_env()?;
    Ok(cfg)
}

/// Load configuration from an explicit file. Environment overrides are
/// applied on top.
pub fn load_from_path(path: &Path) -> Result<MicrobankConfig> {
    let mut cfg = read(path)?;
    cfg.apply_env()?;
    Ok(cfg)
}

fn read(path: &Path) -> Result<MicrobankConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}
