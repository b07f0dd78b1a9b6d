// Tab controller
//
// Tabs are addressed by the same string ids the key bindings use. Activating
// a tab always clears every result and error panel so nothing from the
// previous tab bleeds through. Unknown ids are ignored.

use super::panels::{self, UiCommand};

/// Input tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Tab {
    #[default]
    Encrypt,
    Decrypt,
    GenerateKey,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Encrypt, Tab::Decrypt, Tab::GenerateKey];

    /// Stable identifier used for activation
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Encrypt => "encrypt",
            Tab::Decrypt => "decrypt",
            Tab::GenerateKey => "generate-key",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.id() == id)
    }

    /// Label for the tab bar
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Encrypt => "Encrypt",
            Tab::Decrypt => "Decrypt",
            Tab::GenerateKey => "Generate Key",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Encrypt => 0,
            Tab::Decrypt => 1,
            Tab::GenerateKey => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Encrypt => Tab::Decrypt,
            Tab::Decrypt => Tab::GenerateKey,
            Tab::GenerateKey => Tab::Encrypt,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Encrypt => Tab::GenerateKey,
            Tab::Decrypt => Tab::Encrypt,
            Tab::GenerateKey => Tab::Decrypt,
        }
    }
}

/// Commands that switch to the tab named `tab_id`
///
/// Returns no commands when the id matches no tab.
pub fn activate_tab(tab_id: &str) -> Vec<UiCommand> {
    let Some(tab) = Tab::from_id(tab_id) else {
        tracing::debug!("Ignoring activation of unknown tab {:?}", tab_id);
        return Vec::new();
    };

    let mut commands = vec![UiCommand::ActivateTab(tab)];
    commands.extend(panels::hide_all());
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::operation::ResultFields;
    use crate::state::panels::{show_error, show_result, UiState};

    #[test]
    fn test_activate_each_tab_hides_panels() {
        for tab in Tab::ALL {
            let mut state = UiState::new();
            state.apply_all(show_result(ResultFields::Decrypted {
                decrypted_message: "hi".to_string(),
            }));
            state.apply_all(show_error("stale"));

            state.apply_all(activate_tab(tab.id()));

            assert_eq!(state.active_tab, tab);
            assert_eq!(state.visible_panel, None);
            assert!(!state.error_visible);
        }
    }

    #[test]
    fn test_unknown_tab_is_noop() {
        assert!(activate_tab("settings").is_empty());
        assert!(activate_tab("").is_empty());

        let mut state = UiState::new();
        state.apply_all(activate_tab("decrypt"));
        state.apply_all(activate_tab("nope"));
        assert_eq!(state.active_tab, Tab::Decrypt);
    }

    #[test]
    fn test_ids_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_id(tab.id()), Some(tab));
        }
    }

    #[test]
    fn test_next_prev_cycle() {
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
        assert_eq!(Tab::GenerateKey.next(), Tab::Encrypt);
    }
}
