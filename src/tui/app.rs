// TUI application state
//
// `App` owns the single `UiState` and everything that feeds it. Work that
// needs the network is spawned onto tokio tasks which report back through
// `AppMessage`s; the event loop hands those to `handle_message`, so all
// state changes happen on the UI task.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use super::form::Form;
use crate::api::{ApiError, CryptoService};
use crate::logging::LogBuffer;
use crate::state::connectivity::{self, ConnectivityStatus};
use crate::state::operation::{self, Operation};
use crate::state::tabs;
use crate::state::{
    ClipboardCopier, ConnectivityMonitor, CopyOutcome, CopySource, Decrypt, Encrypt, GenerateKey,
    NetworkEvent, PanelId, Probe, Submission, Tab, UiCommand, UiState,
};

/// Spinner frames for the loading indicator
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Results of background work, delivered to the UI task
#[derive(Debug)]
pub enum AppMessage {
    /// Final commands of an operation
    Commands(Vec<UiCommand>),
    ProbeFinished(Probe, Result<(), ApiError>),
}

pub struct App<S: CryptoService> {
    pub state: UiState,
    pub encrypt_form: Form,
    pub decrypt_form: Form,
    pub log_buffer: LogBuffer,
    pub should_quit: bool,
    monitor: ConnectivityMonitor,
    copier: ClipboardCopier,
    service: Arc<S>,
    tx: mpsc::UnboundedSender<AppMessage>,
    frame: usize,
}

impl<S: CryptoService> App<S> {
    pub fn new(
        service: Arc<S>,
        copier: ClipboardCopier,
        log_buffer: LogBuffer,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> Self {
        Self {
            state: UiState::new(),
            encrypt_form: Form::encrypt(),
            decrypt_form: Form::decrypt(),
            log_buffer,
            should_quit: false,
            monitor: ConnectivityMonitor::new(),
            copier,
            service,
            tx,
            frame: 0,
        }
    }

    pub fn connectivity(&self) -> &ConnectivityStatus {
        self.monitor.status()
    }

    pub fn tick_animation(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.frame % SPINNER.len()]
    }

    /// Form for the active tab (generate-key has none)
    pub fn active_form(&self) -> Option<&Form> {
        match self.state.active_tab {
            Tab::Encrypt => Some(&self.encrypt_form),
            Tab::Decrypt => Some(&self.decrypt_form),
            Tab::GenerateKey => None,
        }
    }

    fn active_form_mut(&mut self) -> Option<&mut Form> {
        match self.state.active_tab {
            Tab::Encrypt => Some(&mut self.encrypt_form),
            Tab::Decrypt => Some(&mut self.decrypt_form),
            Tab::GenerateKey => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tabs and operations
    // ─────────────────────────────────────────────────────────────────────

    pub fn activate_tab(&mut self, tab_id: &str) {
        self.state.apply_all(tabs::activate_tab(tab_id));
    }

    /// Submit the operation of the active tab
    pub fn submit_active(&mut self) {
        match self.state.active_tab {
            Tab::GenerateKey => self.dispatch::<GenerateKey>(&()),
            Tab::Encrypt => {
                let input = self.encrypt_form.encrypt_input();
                self.dispatch::<Encrypt>(&input);
            }
            Tab::Decrypt => {
                let input = self.decrypt_form.decrypt_input();
                self.dispatch::<Decrypt>(&input);
            }
        }
    }

    /// Validate, show the start state and spawn the request
    pub fn dispatch<O: Operation>(&mut self, input: &O::Input) {
        let (start, request) = match operation::submit::<O>(input) {
            Submission::Rejected(commands) => {
                self.state.apply_all(commands);
                return;
            }
            Submission::Dispatched { start, request } => (start, request),
        };
        self.state.apply_all(start);
        tracing::debug!("Sending {:?} request", request.kind());

        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            // Inner task so a panic still ends in HideLoading
            let task = tokio::spawn(async move { operation::complete(service.as_ref(), request).await });
            let commands = match task.await {
                Ok(commands) => commands,
                Err(e) => {
                    tracing::error!("{:?} request task failed: {}", O::KIND, e);
                    operation::abandoned(O::KIND, e)
                }
            };
            let _ = tx.send(AppMessage::Commands(commands));
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Connectivity
    // ─────────────────────────────────────────────────────────────────────

    pub fn network_event(&mut self, event: NetworkEvent) {
        if let Some(probe) = self.monitor.on_event(event) {
            self.spawn_probe(probe);
        }
    }

    /// Re-probe the service unless the link is known to be down
    pub fn refresh_status(&mut self) {
        if let Some(probe) = self.monitor.refresh() {
            self.spawn_probe(probe);
        }
    }

    fn spawn_probe(&self, probe: Probe) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let (probe, outcome) = connectivity::run_probe(service.as_ref(), probe).await;
            let _ = tx.send(AppMessage::ProbeFinished(probe, outcome));
        });
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Commands(commands) => self.state.apply_all(commands),
            AppMessage::ProbeFinished(probe, outcome) => {
                self.monitor.apply(probe, outcome);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Clipboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn copy(&mut self, source: CopySource, now: Instant) -> CopyOutcome {
        let text = self.state.copy_text(source);
        self.copier.copy(source, text, now)
    }

    pub fn copy_label(&self, source: CopySource, now: Instant) -> &'static str {
        self.copier.label(source, now)
    }

    /// Main copyable field of the visible panel
    fn primary_copy_source(&self) -> Option<CopySource> {
        Some(match self.state.visible_panel? {
            PanelId::GeneratedKey => CopySource::GeneratedKey,
            PanelId::EncryptResult => CopySource::EncryptedMessage,
            PanelId::DecryptResult => CopySource::DecryptedMessage,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Keyboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::F(1) => self.activate_tab(Tab::Encrypt.id()),
            KeyCode::F(2) => self.activate_tab(Tab::Decrypt.id()),
            KeyCode::F(3) => self.activate_tab(Tab::GenerateKey.id()),
            KeyCode::Right if ctrl => self.activate_tab(self.state.active_tab.next().id()),
            KeyCode::Left if ctrl => self.activate_tab(self.state.active_tab.prev().id()),
            KeyCode::Char('r') if ctrl => self.refresh_status(),
            KeyCode::Char('y') if ctrl => {
                if let Some(source) = self.primary_copy_source() {
                    self.copy(source, Instant::now());
                }
            }
            KeyCode::Char('k') if ctrl => {
                self.copy(CopySource::EncryptionKey, Instant::now());
            }
            KeyCode::Enter => self.submit_active(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.active_form_mut() {
                    form.focus_next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.active_form_mut() {
                    form.focus_prev();
                }
            }
            _ => {
                if let Some(field) = self.active_form_mut().and_then(Form::focused_mut) {
                    field.handle_key(key);
                }
            }
        }
    }

    /// Bracketed paste into the focused field
    pub fn paste(&mut self, text: &str) {
        if let Some(field) = self.active_form_mut().and_then(Form::focused_mut) {
            field.insert_str(text);
        }
    }
}
