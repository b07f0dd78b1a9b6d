//! Result panels and the shared UI state
//!
//! `UiState` is only changed through [`UiState::apply`]. The helper functions
//! in this module build the command sequences for the four panel operations
//! (hide all, show loading, show error, show result); callers concatenate them
//! and hand the list to the app.
//!
//! Invariants kept by `apply`:
//! - at most one of {error panel, one result panel} is visible
//! - the loading indicator and the error panel are never visible together

use std::collections::HashMap;

use super::clipboard::CopySource;
use super::operation::ResultFields;
use super::tabs::Tab;

/// Result panels, one per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    GeneratedKey,
    EncryptResult,
    DecryptResult,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [
        PanelId::GeneratedKey,
        PanelId::EncryptResult,
        PanelId::DecryptResult,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelId::GeneratedKey => "Generated Key",
            PanelId::EncryptResult => "Encrypted Message",
            PanelId::DecryptResult => "Decrypted Message",
        }
    }
}

/// A single mutation of [`UiState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    ActivateTab(Tab),
    ShowPanel(PanelId),
    HidePanel(PanelId),
    /// Replace the contents of the panel the fields belong to
    SetResult(ResultFields),
    ShowLoading,
    HideLoading,
    ShowError(String),
    HideError,
}

/// Everything the screen shows about tabs, panels, loading and errors
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_tab: Tab,
    pub visible_panel: Option<PanelId>,
    pub loading_visible: bool,
    pub error_visible: bool,
    /// Last error text; kept after the panel is hidden
    pub error_text: Option<String>,
    results: HashMap<PanelId, ResultFields>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::ActivateTab(tab) => self.active_tab = tab,
            UiCommand::ShowPanel(panel) => {
                self.error_visible = false;
                self.visible_panel = Some(panel);
            }
            UiCommand::HidePanel(panel) => {
                if self.visible_panel == Some(panel) {
                    self.visible_panel = None;
                }
            }
            UiCommand::SetResult(fields) => {
                self.results.insert(fields.panel(), fields);
            }
            UiCommand::ShowLoading => {
                self.error_visible = false;
                self.loading_visible = true;
            }
            UiCommand::HideLoading => self.loading_visible = false,
            UiCommand::ShowError(message) => {
                self.error_text = Some(message);
                self.error_visible = true;
                self.loading_visible = false;
                self.visible_panel = None;
            }
            UiCommand::HideError => self.error_visible = false,
        }
    }

    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = UiCommand>) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Error text, only while the error panel is visible
    pub fn visible_error(&self) -> Option<&str> {
        if self.error_visible {
            self.error_text.as_deref()
        } else {
            None
        }
    }

    /// Contents of the visible result panel
    pub fn visible_result(&self) -> Option<&ResultFields> {
        self.visible_panel.and_then(|p| self.result(p))
    }

    pub fn result(&self, panel: PanelId) -> Option<&ResultFields> {
        self.results.get(&panel)
    }

    /// Current text of a copyable field, if its panel is on screen
    pub fn copy_text(&self, source: CopySource) -> Option<&str> {
        if self.visible_panel != Some(source.panel()) {
            return None;
        }
        match (self.result(source.panel())?, source) {
            (ResultFields::GeneratedKey { key }, CopySource::GeneratedKey) => Some(key.as_str()),
            (
                ResultFields::Encrypted {
                    encrypted_message, ..
                },
                CopySource::EncryptedMessage,
            ) => Some(encrypted_message.as_str()),
            (ResultFields::Encrypted { used_key, .. }, CopySource::EncryptionKey) => {
                Some(used_key.as_str())
            }
            (
                ResultFields::Decrypted { decrypted_message },
                CopySource::DecryptedMessage,
            ) => Some(decrypted_message.as_str()),
            _ => None,
        }
    }
}

/// Hide every result panel and the error panel
pub fn hide_all() -> Vec<UiCommand> {
    let mut commands: Vec<UiCommand> = PanelId::ALL.into_iter().map(UiCommand::HidePanel).collect();
    commands.push(UiCommand::HideError);
    commands
}

/// Show the loading indicator, hiding any error first
pub fn show_loading() -> Vec<UiCommand> {
    vec![UiCommand::HideError, UiCommand::ShowLoading]
}

/// Show an error message and drop the loading indicator
pub fn show_error(message: impl Into<String>) -> Vec<UiCommand> {
    vec![UiCommand::ShowError(message.into()), UiCommand::HideLoading]
}

/// Fill a result panel and show it
///
/// Callers start operations with [`hide_all`], so only this panel ends up visible.
pub fn show_result(fields: ResultFields) -> Vec<UiCommand> {
    let panel = fields.panel();
    vec![UiCommand::SetResult(fields), UiCommand::ShowPanel(panel)]
}
