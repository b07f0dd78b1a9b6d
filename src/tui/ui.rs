// Screen layout - called on every frame
//
//   ┌ title bar ─────────────── status ┐
//   ┌ F1 Encrypt │ F2 Decrypt │ F3 ... ┐
//   form fields (or the generate-key hint)
//   loading / error / result
//   last log line                 hints

use super::app::App;
use super::components::{form_panel, result_panel, status_bar, tab_bar, title_bar};
use crate::api::CryptoService;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw<S: CryptoService>(f: &mut Frame, app: &App<S>) {
    let [title_area, tabs_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(f.area());

    title_bar::render(f, title_area, app);
    tab_bar::render(f, tabs_area, &app.state);

    let input_height = match app.active_form() {
        Some(form) => form.fields.len() as u16 * form_panel::FIELD_HEIGHT,
        None => 2,
    };
    let [input_area, result_area] =
        Layout::vertical([Constraint::Length(input_height), Constraint::Min(0)]).areas(body_area);

    match app.active_form() {
        Some(form) => form_panel::render(f, input_area, form),
        None => {
            let hint = Paragraph::new(" Press Enter to generate a new key")
                .style(Style::default().fg(Color::Gray));
            f.render_widget(hint, input_area);
        }
    }

    result_panel::render(f, result_area, app);
    status_bar::render(f, status_area, &app.log_buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::paths;
    use crate::logging::LogBuffer;
    use crate::state::clipboard::{ClipboardBackend, ClipboardCopier};
    use crate::state::testing::StubService;
    use crate::tui::app::AppMessage;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct NullClipboard;

    impl ClipboardBackend for NullClipboard {
        fn name(&self) -> &'static str {
            "null"
        }

        fn set_text(&mut self, _text: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn test_app(
        service: StubService,
    ) -> (App<StubService>, mpsc::UnboundedReceiver<AppMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let copier = ClipboardCopier::new(Box::new(NullClipboard), None, Duration::from_secs(2));
        (App::new(Arc::new(service), copier, LogBuffer::new(), tx), rx)
    }

    #[tokio::test]
    async fn test_initial_screen() {
        let (app, _rx) = test_app(StubService::new());
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen(&terminal);

        assert!(text.contains("Encryptor"));
        assert!(text.contains("Checking API..."));
        assert!(text.contains("F1 Encrypt"));
        assert!(text.contains("Text to encrypt"));
    }

    #[tokio::test]
    async fn test_error_and_result_rendering() {
        let service = StubService::new().respond(paths::GENERATE_KEY, Ok(json!({ "key": "abc123" })));
        let (mut app, mut rx) = test_app(service);
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();

        app.submit_active();
        terminal.draw(|f| draw(f, &app)).unwrap();
        assert!(screen(&terminal).contains("Please enter a message to encrypt"));

        app.activate_tab("generate-key");
        app.submit_active();
        app.handle_message(rx.recv().await.unwrap());
        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen(&terminal);

        assert!(text.contains("Generated Key"));
        assert!(text.contains("abc123"));
        assert!(text.contains("[Ctrl+Y Copy]"));
        assert!(!text.contains("Please enter a message"));
    }
}
