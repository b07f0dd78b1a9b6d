// Result area component
//
// Shows whichever of loading indicator, error panel and result panel the
// UI state has visible. The state guarantees at most one of error/result.

use crate::api::CryptoService;
use crate::state::{CopySource, ResultFields};
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

pub fn render<S: CryptoService>(f: &mut Frame, area: Rect, app: &App<S>) {
    let state = &app.state;

    if let Some(error) = state.visible_error() {
        render_error(f, area, error);
        return;
    }

    if let (Some(panel), Some(fields)) = (state.visible_panel, state.visible_result()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(format!(" {} ", panel.title()));
        let text = result_text(fields, |source| app.copy_label(source, Instant::now()));
        f.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            area,
        );
        return;
    }

    if state.loading_visible {
        let loading = Paragraph::new(format!(" {} Working...", app.spinner_char()))
            .style(Style::default().fg(Color::Yellow));
        f.render_widget(loading, area);
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ");
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Lines for a result: a heading with its copy label, then the value
fn result_text<'a>(fields: &'a ResultFields, label: impl Fn(CopySource) -> &'static str) -> Text<'a> {
    let mut lines = Vec::new();
    let mut push = |heading: &'static str, value: &'a str, source: CopySource, key: &'static str| {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(vec![
            Span::styled(heading, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{} {}]", key, label(source)),
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(value));
    };

    match fields {
        ResultFields::GeneratedKey { key } => {
            push("Key", key, CopySource::GeneratedKey, "Ctrl+Y");
        }
        ResultFields::Encrypted {
            encrypted_message,
            used_key,
        } => {
            push(
                "Encrypted message",
                encrypted_message,
                CopySource::EncryptedMessage,
                "Ctrl+Y",
            );
            push("Key", used_key, CopySource::EncryptionKey, "Ctrl+K");
        }
        ResultFields::Decrypted { decrypted_message } => {
            push(
                "Decrypted message",
                decrypted_message,
                CopySource::DecryptedMessage,
                "Ctrl+Y",
            );
        }
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clipboard::{LABEL_COPIED, LABEL_IDLE};

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_encrypted_result_lists_both_fields() {
        let fields = ResultFields::Encrypted {
            encrypted_message: "gAAAA".to_string(),
            used_key: "k1".to_string(),
        };
        let text = result_text(&fields, |source| {
            if source == CopySource::EncryptionKey {
                LABEL_COPIED
            } else {
                LABEL_IDLE
            }
        });

        assert_eq!(
            plain(&text),
            vec![
                "Encrypted message  [Ctrl+Y Copy]".to_string(),
                "gAAAA".to_string(),
                String::new(),
                "Key  [Ctrl+K Copied!]".to_string(),
                "k1".to_string(),
            ]
        );
    }
}
