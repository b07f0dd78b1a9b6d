//! Configuration for the encryptor client
//!
//! Configuration is loaded in order of precedence:
//! 1. Command line (`--api-url`, applied by main)
//! 2. Environment variables
//! 3. Config file (~/.config/encryptor-tui/config.toml)
//! 4. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

mod clipboard;
mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use clipboard::{ClipboardConfig, FileClipboard};
pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service address used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

const ENV_API_URL: &str = "ENCRYPTOR_API_URL";
const ENV_REQUEST_TIMEOUT: &str = "ENCRYPTOR_REQUEST_TIMEOUT_SECS";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the encryption service
    pub api_url: String,

    /// Per-request timeout in seconds (0 = wait forever)
    pub request_timeout_secs: u64,

    /// Timeout for the reachability probe
    pub probe_timeout_secs: u64,

    /// How often the link watcher checks for a network route (0 = off)
    pub link_check_interval_secs: u64,

    /// Copy behaviour
    pub clipboard: ClipboardConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 0,
            probe_timeout_secs: 5,
            link_check_interval_secs: 3,
            clipboard: ClipboardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.max(1))
    }

    pub fn link_check_interval(&self) -> Option<Duration> {
        (self.link_check_interval_secs > 0)
            .then(|| Duration::from_secs(self.link_check_interval_secs))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
    pub link_check_interval_secs: Option<u64>,

    /// Optional [clipboard] section
    pub clipboard: Option<FileClipboard>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/encryptor-tui/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("encryptor-tui").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Overwrite the config file with the default template
    pub fn reset_config_file() -> Result<PathBuf> {
        let path = Self::config_path().context("Could not determine home directory")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, Self::default().to_toml())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Load file config if it exists
    ///
    /// A file that exists but can't be read or parsed is an error; falling
    /// back to defaults would hide the mistake.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_file_config(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Result<Self> {
        let file = Self::load_file_config()?;
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // API URL: env > file > default
        let api_url = env(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .or(file.api_url)
            .unwrap_or(defaults.api_url);

        // Request timeout: env > file > default (unparseable env values ignored)
        let request_timeout_secs = env(ENV_REQUEST_TIMEOUT)
            .and_then(|v| v.trim().parse().ok())
            .or(file.request_timeout_secs)
            .unwrap_or(defaults.request_timeout_secs);

        let probe_timeout_secs = file
            .probe_timeout_secs
            .unwrap_or(defaults.probe_timeout_secs);
        let link_check_interval_secs = file
            .link_check_interval_secs
            .unwrap_or(defaults.link_check_interval_secs);

        Self {
            api_url,
            request_timeout_secs,
            probe_timeout_secs,
            link_check_interval_secs,
            clipboard: ClipboardConfig::from_file(file.clipboard),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
