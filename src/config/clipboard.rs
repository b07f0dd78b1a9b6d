//! Clipboard configuration

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClipboardConfig {
    /// How long "Copied!" stays up after a copy
    pub feedback_ms: u64,
    /// Fall back to an OSC 52 terminal escape when the system clipboard fails
    pub osc52_fallback: bool,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 2000,
            osc52_fallback: true,
        }
    }
}

impl ClipboardConfig {
    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    pub fn from_file(file: Option<FileClipboard>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            feedback_ms: file.feedback_ms.unwrap_or(defaults.feedback_ms),
            osc52_fallback: file.osc52_fallback.unwrap_or(defaults.osc52_fallback),
        }
    }
}

/// Clipboard settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileClipboard {
    pub feedback_ms: Option<u64>,
    pub osc52_fallback: Option<bool>,
}
