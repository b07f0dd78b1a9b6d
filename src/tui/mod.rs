// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, redraw ticks, background results)
// - Starting the connectivity probe and the link watcher

pub mod app;
pub mod components;
pub mod form;
pub mod ui;

use crate::api::CryptoService;
use crate::config::Config;
use crate::logging::LogBuffer;
use crate::state::clipboard::{ClipboardBackend, ClipboardCopier, Osc52, SystemClipboard};
use crate::state::connectivity::{self, LinkTarget};
use crate::state::NetworkEvent;
use anyhow::{Context, Result};
use app::{App, AppMessage};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI until the user quits
pub async fn run_tui<S: CryptoService>(
    service: Arc<S>,
    config: &Config,
    log_buffer: LogBuffer,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let fallback: Option<Box<dyn ClipboardBackend>> = if config.clipboard.osc52_fallback {
        Some(Box::new(Osc52::stdout()))
    } else {
        None
    };
    let copier = ClipboardCopier::new(
        Box::new(SystemClipboard),
        fallback,
        config.clipboard.feedback(),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(service, copier, log_buffer, tx);

    let (net_tx, mut net_rx) = mpsc::unbounded_channel();
    let watcher = config.link_check_interval().map(|interval| {
        let target = LinkTarget::from_url(&config.api_url);
        tracing::debug!("Watching route to {:?} every {:?}", target, interval);
        tokio::spawn(connectivity::watch_link(target, interval, net_tx))
    });

    app.network_event(NetworkEvent::Init);

    let result = run_event_loop(&mut terminal, &mut app, &mut rx, &mut net_rx).await;

    if let Some(watcher) = watcher {
        watcher.abort();
    }

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on terminal input, the redraw tick, results from spawned tasks and
/// link transitions, redrawing after each.
async fn run_event_loop<S: CryptoService>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
    net_rx: &mut mpsc::UnboundedReceiver<NetworkEvent>,
) -> Result<()> {
    // Drives the spinner and the "Copied!" expiry
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => app.handle_key(key),
                        Ok(Event::Paste(text)) => app.paste(&text),
                        _ => {}
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick_animation();
            }

            Some(message) = rx.recv() => {
                app.handle_message(message);
            }

            Some(event) = net_rx.recv() => {
                app.network_event(event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
