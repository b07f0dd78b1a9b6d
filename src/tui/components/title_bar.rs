// Title bar component
//
// App name on the left, connectivity indicator on the right.

use crate::api::CryptoService;
use crate::state::connectivity::{ConnectivityStatus, STATUS_CHECKING};
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Colour and dot for the indicator
fn indicator(status: &ConnectivityStatus) -> (Color, &'static str) {
    if !status.network_online {
        (Color::Yellow, "○")
    } else if status.service_reachable {
        (Color::Green, "●")
    } else if status.display_text == STATUS_CHECKING {
        (Color::DarkGray, "◌")
    } else {
        (Color::Red, "●")
    }
}

pub fn render<S: CryptoService>(f: &mut Frame, area: Rect, app: &App<S>) {
    let status = app.connectivity();
    let (color, dot) = indicator(status);

    let status_line = Line::from(vec![
        Span::styled(format!(" {} ", dot), Style::default().fg(color)),
        Span::styled(format!("{} ", status.display_text), Style::default().fg(color)),
    ])
    .right_aligned();

    let title = Paragraph::new(" 🔐 Encryptor")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title_top(status_line),
        );

    f.render_widget(title, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::connectivity::{STATUS_NO_NETWORK, STATUS_ONLINE, STATUS_SERVICE_DOWN};

    fn status(reachable: bool, online: bool, text: &str) -> ConnectivityStatus {
        ConnectivityStatus {
            service_reachable: reachable,
            network_online: online,
            display_text: text.to_string(),
        }
    }

    #[test]
    fn test_indicator_colours() {
        assert_eq!(indicator(&ConnectivityStatus::default()).0, Color::DarkGray);
        assert_eq!(indicator(&status(true, true, STATUS_ONLINE)).0, Color::Green);
        assert_eq!(indicator(&status(false, true, STATUS_SERVICE_DOWN)).0, Color::Red);
        assert_eq!(indicator(&status(false, false, STATUS_NO_NETWORK)).0, Color::Yellow);
    }
}
