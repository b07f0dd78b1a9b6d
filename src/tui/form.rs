// Text input for the encrypt and decrypt forms
//
// The cursor is a char index, so multi-byte input edits cleanly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::state::operation::{DecryptInput, EncryptInput};

/// Single-line editable field
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub label: &'static str,
    pub placeholder: &'static str,
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Cursor position in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Insert pasted text; newlines become spaces
    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert(if c == '\n' || c == '\r' { ' ' } else { c });
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Apply an editing key; returns false if the key isn't an edit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            if key.code == KeyCode::Char('u') && key.modifiers == KeyModifiers::CONTROL {
                self.clear();
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.char_count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            _ => return false,
        }
        true
    }
}

/// A set of fields with one focused
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub focused: usize,
}

impl Form {
    pub fn encrypt() -> Self {
        Self {
            fields: vec![
                TextField::new("Message", "Text to encrypt"),
                TextField::new("Key", "Optional, a new key is generated if empty"),
            ],
            focused: 0,
        }
    }

    pub fn decrypt() -> Self {
        Self {
            fields: vec![
                TextField::new("Encrypted message", "Token returned by encrypt"),
                TextField::new("Key", "Key used to encrypt"),
            ],
            focused: 0,
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut TextField> {
        self.fields.get_mut(self.focused)
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.value().to_string())
            .unwrap_or_default()
    }

    pub fn encrypt_input(&self) -> EncryptInput {
        EncryptInput {
            message: self.value(0),
            key: self.value(1),
        }
    }

    pub fn decrypt_input(&self) -> DecryptInput {
        DecryptInput {
            encrypted_message: self.value(0),
            key: self.value(1),
        }
    }
}
