// Form panel component
//
// One bordered box per field. The focused field gets a highlighted border
// and the terminal cursor.

use super::formatters::visible_window;
use crate::tui::form::{Form, TextField};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height of one field box
pub const FIELD_HEIGHT: u16 = 3;

pub fn render(f: &mut Frame, area: Rect, form: &Form) {
    let constraints = form
        .fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT));
    let rows = Layout::vertical(constraints).split(area);

    for (index, (field, row)) in form.fields.iter().zip(rows.iter()).enumerate() {
        render_field(f, *row, field, index == form.focused);
    }
}

fn render_field(f: &mut Frame, area: Rect, field: &TextField, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", field.label));
    let inner = block.inner(area);

    let (content, cursor_col) = if field.value().is_empty() {
        let placeholder = Span::styled(
            field.placeholder,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
        (Line::from(placeholder), 0)
    } else {
        let (visible, col) = visible_window(field.value(), field.cursor(), inner.width as usize);
        (Line::from(visible), col)
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    if focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position(Position::new(inner.x + cursor_col as u16, inner.y));
    }
}
