//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# encryptor-tui configuration

# Base URL of the encryption service (ENCRYPTOR_API_URL and --api-url override)
api_url = "{api_url}"

# Seconds to wait for generate/encrypt/decrypt before reporting an error.
# 0 waits forever; the loading indicator stays up until the service answers.
request_timeout_secs = {request_timeout}

# Seconds to wait for the reachability check (GET /)
probe_timeout_secs = {probe_timeout}

# Seconds between network route checks (0 disables online/offline detection)
link_check_interval_secs = {link_interval}

[clipboard]
# How long the "Copied!" label stays up, in milliseconds
feedback_ms = {feedback_ms}
# Send an OSC 52 escape to the terminal when the system clipboard fails
osc52_fallback = {osc52}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON log files (the footer always shows the latest line)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = escape(&self.api_url),
            request_timeout = self.request_timeout_secs,
            probe_timeout = self.probe_timeout_secs,
            link_interval = self.link_check_interval_secs,
            feedback_ms = self.clipboard.feedback_ms,
            osc52 = self.clipboard.osc52_fallback,
            log_level = escape(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = escape(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = escape(&self.logging.file_prefix),
        )
    }
}

/// Escape a value for a basic TOML string
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
