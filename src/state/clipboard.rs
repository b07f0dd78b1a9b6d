//! Clipboard copy with fallback and acknowledgement
//!
//! The primary backend is the system clipboard via `arboard`. When that fails
//! (no display server, permission denied) the text is sent to the terminal
//! as an OSC 52 escape, which most terminal emulators turn into a clipboard
//! write, including over SSH.
//!
//! A successful primary copy swaps the field's "Copy" label for "Copied!"
//! for a short window. A later copy of the same field restarts the window.
//! Fallback copies get no acknowledgement since the terminal gives no
//! confirmation.

use anyhow::{Context, Result};
use arboard::Clipboard;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

use super::panels::PanelId;

pub const LABEL_IDLE: &str = "Copy";
pub const LABEL_COPIED: &str = "Copied!";

/// Copyable result fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopySource {
    GeneratedKey,
    EncryptedMessage,
    EncryptionKey,
    DecryptedMessage,
}

impl CopySource {
    pub fn panel(&self) -> PanelId {
        match self {
            CopySource::GeneratedKey => PanelId::GeneratedKey,
            CopySource::EncryptedMessage | CopySource::EncryptionKey => PanelId::EncryptResult,
            CopySource::DecryptedMessage => PanelId::DecryptResult,
        }
    }
}

/// Something that can put text on a clipboard
pub trait ClipboardBackend {
    fn name(&self) -> &'static str;

    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard, opened fresh for every copy
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}

/// OSC 52 escape written to the terminal
pub struct Osc52<W: Write> {
    out: W,
}

impl<W: Write> Osc52<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl Osc52<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> ClipboardBackend for Osc52<W> {
    fn name(&self) -> &'static str {
        "osc52"
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(osc52_sequence(text).as_bytes())
            .context("Failed to write OSC 52 sequence")?;
        self.out.flush().context("Failed to flush terminal")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Primary clipboard accepted the text
    Copied,
    /// Primary failed, fallback accepted the text
    CopiedWithFallback,
    /// Both paths failed (logged, not surfaced)
    Failed,
    /// Nothing on screen to copy
    Empty,
}

pub struct ClipboardCopier {
    primary: Box<dyn ClipboardBackend>,
    fallback: Option<Box<dyn ClipboardBackend>>,
    feedback: Duration,
    acks: HashMap<CopySource, Instant>,
}

impl ClipboardCopier {
    pub fn new(
        primary: Box<dyn ClipboardBackend>,
        fallback: Option<Box<dyn ClipboardBackend>>,
        feedback: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            feedback,
            acks: HashMap::new(),
        }
    }

    /// Copy `text` for `source`; never fails
    pub fn copy(&mut self, source: CopySource, text: Option<&str>, now: Instant) -> CopyOutcome {
        let Some(text) = text else {
            return CopyOutcome::Empty;
        };

        match self.primary.set_text(text) {
            Ok(()) => {
                tracing::debug!("Copied {:?} via {} clipboard", source, self.primary.name());
                self.acks.insert(source, now);
                return CopyOutcome::Copied;
            }
            Err(e) => {
                tracing::warn!("Could not copy text: {:#}", e);
            }
        }

        let Some(fallback) = self.fallback.as_mut() else {
            return CopyOutcome::Failed;
        };
        match fallback.set_text(text) {
            Ok(()) => {
                tracing::debug!("Copied {:?} via {} fallback", source, fallback.name());
                CopyOutcome::CopiedWithFallback
            }
            Err(e) => {
                tracing::warn!("Fallback copy failed: {:#}", e);
                CopyOutcome::Failed
            }
        }
    }

    /// Label shown next to `source` at time `now`
    pub fn label(&self, source: CopySource, now: Instant) -> &'static str {
        match self.acks.get(&source) {
            Some(at) if now.saturating_duration_since(*at) < self.feedback => LABEL_COPIED,
            _ => LABEL_IDLE,
        }
    }
}
