// Status bar component
//
// Most recent log line on the left, key hints on the right.

use super::formatters::truncate_to_width;
use crate::logging::{LogBuffer, LogLevel};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const HINTS: &str = "Enter submit │ Tab field │ F1-F3 tabs │ ^Y/^K copy │ ^R recheck │ ^C quit ";

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug | LogLevel::Trace => Color::DarkGray,
    }
}

pub fn render(f: &mut Frame, area: Rect, logs: &LogBuffer) {
    let hints_width = (HINTS.width() as u16).min(area.width / 2);
    let [log_area, hints_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

    if let Some(entry) = logs.latest() {
        let prefix = format!(" {} {:<5} ", entry.timestamp.format("%H:%M:%S"), entry.level.as_str());
        let room = (log_area.width as usize).saturating_sub(prefix.width() + 1);
        let line = Line::from(vec![
            Span::styled(prefix, Style::default().fg(level_color(entry.level))),
            Span::raw(truncate_to_width(&entry.message, room)),
        ]);
        f.render_widget(Paragraph::new(line), log_area);
    }

    let hints = Paragraph::new(truncate_to_width(HINTS, hints_area.width as usize))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(hints, hints_area);
}
