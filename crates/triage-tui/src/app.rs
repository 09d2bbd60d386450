//! Main application state and render loop.
//!
//! The App owns the two core components — the input manager and the
//! response state — and wires them to the terminal. One submission may be
//! in flight at a time; the `loading` flag on the response state is the
//! sole guard, and while it is set every mutating action (mode switch,
//! staging, edits, another submit) is rejected without state change.

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Terminal;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use triage_api::ApiClient;
use triage_core::input::{InputManager, Mode};
use triage_core::response::{Artifact, ResponseState};
use triage_core::TriageConfig;

use crate::action::{Action, InputMode};
use crate::components::dropzone::DropzoneComponent;
use crate::components::help::HelpComponent;
use crate::components::response_panel::ResponsePanelComponent;
use crate::components::status_bar::StatusBarComponent;
use crate::components::text_entry::TextEntryComponent;
use crate::components::{Component, ViewContext};
use crate::event::{self, EventHandler, InputModeFlag};
use crate::theme::Theme;

/// Main application state.
pub struct App {
    /// Input mode, staged payload, drag-hover flag.
    input: InputManager,
    /// What the response area displays; `loading` is the re-entrancy guard.
    response: ResponseState,
    /// Active blocking notice, if any.
    notice: Option<String>,
    /// Whether the app should exit.
    should_quit: bool,
    /// Whether keys currently go to the focused text field.
    editing: bool,
    /// Shared flag to tell the EventHandler which key-mapping to use.
    input_mode_flag: InputModeFlag,

    /// HTTP client for the classification endpoint (shared with the
    /// in-flight task).
    client: Arc<ApiClient>,

    // Components
    dropzone: DropzoneComponent,
    text_entry: TextEntryComponent,
    response_panel: ResponsePanelComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
}

impl App {
    pub fn new(config: &TriageConfig) -> anyhow::Result<Self> {
        let client = Arc::new(ApiClient::new(
            config.api.base_url.clone(),
            config.api.timeout_seconds,
        )?);
        Ok(Self {
            input: InputManager::new(),
            response: ResponseState::initial(),
            notice: None,
            should_quit: false,
            editing: true,
            input_mode_flag: event::new_input_mode_flag(),
            client,
            dropzone: DropzoneComponent::new(),
            text_entry: TextEntryComponent::new(),
            response_panel: ResponsePanelComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
        })
    }

    /// Pre-stage a file from CLI args.
    pub fn set_initial_file(&mut self, path: String) {
        self.dropzone.set_path(path.clone());
        self.stage_file(&path, false);
    }

    /// Pre-fill pasted text from CLI args.
    pub fn set_initial_text(&mut self, text: String) {
        self.input.set_mode(Mode::Text);
        self.text_entry.set_text(text.clone());
        self.input.set_text(text);
    }

    /// Run the TUI application.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Set up terminal.
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Create the action channel.
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

        // Start the event handler with the shared input mode flag.
        let event_tx = tx.clone();
        let mode_flag = self.input_mode_flag.clone();
        let event_handler = EventHandler::new(event_tx, Duration::from_millis(100), mode_flag);
        tokio::spawn(async move {
            event_handler.run().await;
        });

        self.sync_input_mode();

        // Main loop.
        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if let Some(action) = rx.recv().await {
                self.handle_action(&action, &tx);

                if self.should_quit {
                    break;
                }
            }
        }

        // Restore terminal.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Determine and set the correct input mode based on the current state.
    /// Called after every action.
    fn sync_input_mode(&self) {
        let mode = self.current_input_mode();
        event::set_input_mode(&self.input_mode_flag, mode);
    }

    /// What input mode should be active right now?
    fn current_input_mode(&self) -> InputMode {
        // Help stays in normal mode so any key closes it; while a request
        // is in flight the inputs are disabled anyway.
        if self.help.visible || self.response.loading || !self.editing {
            return InputMode::Normal;
        }
        InputMode::Editing
    }

    /// Dispatch an action.
    fn handle_action(&mut self, action: &Action, tx: &mpsc::UnboundedSender<Action>) {
        // While help is visible, any key dismisses it and nothing else runs.
        if self.help.visible && !matches!(action, Action::Tick | Action::PointerMoved { .. }) {
            self.help.handle_action(action);
            self.sync_input_mode();
            return;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::ToggleHelp => {
                self.help.handle_action(action);
            }
            Action::Tick => {}
            Action::Notice(msg) => {
                self.notice = Some(msg.clone());
            }
            Action::EnterEditing => {
                self.notice = None;
                self.editing = true;
            }
            Action::LeaveEditing => {
                self.editing = false;
            }

            // ── Mode selection ──────────────────────────────────
            Action::SetMode(mode) => self.switch_mode(*mode),
            Action::ToggleMode => self.switch_mode(self.input.mode().other()),

            // ── Staging ─────────────────────────────────────────
            Action::StageFile { path, via_drop } => self.stage_file(path, *via_drop),
            Action::PointerMoved { column, row } => self.pointer_moved(*column, *row),

            // ── Submission ──────────────────────────────────────
            Action::Submit => self.try_submit(tx),
            Action::SubmissionResolved(outcome) => {
                // The sole resolution point: fires exactly once per
                // accepted submission and always clears `loading`.
                let artifact = match self.input.mode() {
                    Mode::Upload => Artifact::Upload {
                        staged_name: self
                            .input
                            .staged_file_name()
                            .unwrap_or("file")
                            .to_string(),
                    },
                    Mode::Text => Artifact::PastedText,
                };
                self.response = ResponseState::conclude(outcome.clone(), &artifact);
                info!(status = %self.response.status_message, "Submission resolved");
            }

            // ── Text editing: forward to the active component ───
            _ => {
                if self.response.loading {
                    // Inputs are frozen while a request is in flight.
                    return;
                }
                let chained = match self.input.mode() {
                    Mode::Upload => self.dropzone.handle_action(action),
                    Mode::Text => {
                        let chained = self.text_entry.handle_action(action);
                        // Mirror the buffer into the staged input wholesale;
                        // validity stays a derived question.
                        self.input.set_text(self.text_entry.text().to_string());
                        chained
                    }
                };
                if let Some(chained) = chained {
                    self.handle_action(&chained, tx);
                }
            }
        }

        self.sync_input_mode();
    }

    /// Switch input mode: clears the staged input and resets the response
    /// content fields. Rejected outright while a submission is in flight.
    fn switch_mode(&mut self, mode: Mode) {
        if self.response.loading {
            self.notice = Some("Wait for the current analysis to finish.".to_string());
            return;
        }
        self.input.set_mode(mode);
        self.response.reset_results();
        self.dropzone.reset();
        self.text_entry.reset();
        self.notice = None;
        debug!(?mode, "Input mode switched");
    }

    /// Stage a candidate file (picked or dropped). Invalid types surface a
    /// blocking notice and leave the staged input unset.
    fn stage_file(&mut self, path: &str, via_drop: bool) {
        if self.response.loading {
            self.notice = Some("Wait for the current analysis to finish.".to_string());
            return;
        }

        let result = if via_drop {
            self.input.drop_file(Path::new(path))
        } else {
            self.input.select_file(Path::new(path))
        };

        match result {
            Ok(()) => {
                let name = self.input.staged_file_name().unwrap_or(path).to_string();
                if via_drop {
                    self.response.set_status(format!("File {name} selected via drop."));
                } else {
                    self.response.set_status(format!("File {name} selected."));
                }
                self.response.reset_results();
                self.notice = None;
                info!(file = %name, via_drop, "File staged");
            }
            Err(e) => {
                warn!(path, "Rejected candidate file: {}", e);
                self.notice = Some(e.to_string());
            }
        }
    }

    /// Drive the drop-target highlight from pointer movement. Only the
    /// enter/leave edges mutate the flag; movement inside the zone is
    /// ignored so high-frequency hover events cannot flicker it.
    fn pointer_moved(&mut self, column: u16, row: u16) {
        if self.input.mode() != Mode::Upload || self.response.loading {
            return;
        }
        let inside = self.dropzone.contains(column, row);
        if inside != self.input.drag_active() {
            self.input.set_drag_active(inside);
        }
    }

    /// Validate, transition to the in-flight state, and issue exactly one
    /// request. Rejections mutate nothing but the notice.
    fn try_submit(&mut self, tx: &mpsc::UnboundedSender<Action>) {
        if self.response.loading {
            // Idempotent rejection; no duplicate request.
            debug!("Submit ignored: request already in flight");
            return;
        }
        if let Err(e) = self.input.validate_for_submit() {
            self.notice = Some(e.to_string());
            return;
        }
        let Some(payload) = self.input.to_payload() else {
            self.notice = Some(self.input.rejection_notice().to_string());
            return;
        };

        // Single atomic transition: loading plus all placeholders at once.
        self.response = ResponseState::in_flight();
        self.notice = None;
        info!(file = %payload.file_name, bytes = payload.bytes.len(), "Submitting for classification");

        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.classify(payload).await;
            let _ = tx.send(Action::SubmissionResolved(outcome));
        });
    }

    /// Render the full UI.
    fn render(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2),  // Mode tabs
            Constraint::Min(9),     // Input area
            Constraint::Length(11), // Response area
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

        let ctx = ViewContext {
            input: &self.input,
            response: &self.response,
            notice: self.notice.as_deref(),
        };

        self.render_tabs(frame, chunks[0]);

        match self.input.mode() {
            Mode::Upload => self.dropzone.render(frame, chunks[1], &ctx),
            Mode::Text => self.text_entry.render(frame, chunks[1], &ctx),
        }

        self.response_panel.render(frame, chunks[2], &ctx);
        self.status_bar.render(frame, chunks[3], &ctx);

        // Overlay (rendered on top)
        self.help.render(frame, area, &ctx);
    }

    /// Render the mode tab bar.
    fn render_tabs(&self, frame: &mut ratatui::Frame, area: Rect) {
        let titles: Vec<Line> = Mode::all()
            .iter()
            .map(|mode| {
                let style = if *mode == self.input.mode() {
                    Theme::tab_active()
                } else {
                    Theme::tab_inactive()
                };
                Line::from(Span::styled(mode.label(), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.input.mode().index())
            .divider(Span::styled(" | ", Theme::dim()))
            .highlight_style(Theme::tab_active());

        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use triage_core::response::{
        Outcome, API_ERROR_MARKER, CONNECTION_ERROR_MARKER, WAITING_PLACEHOLDER,
    };

    fn test_app() -> (App, mpsc::UnboundedSender<Action>, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(&TriageConfig::default()).expect("client builds");
        (app, tx, rx)
    }

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("triage-app-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    fn type_text(app: &mut App, tx: &mpsc::UnboundedSender<Action>, text: &str) {
        for c in text.chars() {
            app.handle_action(&Action::CharInput(c), tx);
        }
    }

    #[test]
    fn mode_switch_clears_staged_input_and_results() {
        let (mut app, tx, _rx) = test_app();
        app.handle_action(&Action::SetMode(Mode::Text), &tx);
        type_text(&mut app, &tx, "hello world");
        assert!(app.input.is_valid());
        app.response.classification = "Invoice".to_string();

        app.handle_action(&Action::SetMode(Mode::Upload), &tx);
        assert_eq!(app.input.mode(), Mode::Upload);
        assert!(app.input.staged().is_none());
        assert_eq!(app.response.classification, WAITING_PLACEHOLDER);
        assert!(!app.response.loading);
    }

    #[test]
    fn mode_switch_is_rejected_while_loading() {
        let (mut app, tx, _rx) = test_app();
        app.response = ResponseState::in_flight();

        app.handle_action(&Action::SetMode(Mode::Text), &tx);
        assert_eq!(app.input.mode(), Mode::Upload);
        assert!(app.response.loading);
        assert!(app.notice.is_some());
    }

    #[test]
    fn staging_a_valid_file_sets_status_and_resets_results() {
        let (mut app, tx, _rx) = test_app();
        let path = temp_file("report.pdf", b"%PDF");
        app.response.classification = "Old".to_string();

        app.handle_action(
            &Action::StageFile {
                path: path.to_string_lossy().to_string(),
                via_drop: false,
            },
            &tx,
        );
        assert!(app.input.is_valid());
        assert!(app.response.status_message.contains("report.pdf"));
        assert!(app.response.status_message.contains("selected"));
        assert_eq!(app.response.classification, WAITING_PLACEHOLDER);
        assert!(app.notice.is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn staging_an_invalid_type_surfaces_notice_and_stages_nothing() {
        let (mut app, tx, _rx) = test_app();
        let path = temp_file("image.png", b"\x89PNG");

        app.handle_action(
            &Action::StageFile {
                path: path.to_string_lossy().to_string(),
                via_drop: false,
            },
            &tx,
        );
        assert!(app.input.staged().is_none());
        let notice = app.notice.as_deref().expect("blocking notice");
        assert!(notice.contains("not allowed"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn pasted_path_is_treated_as_a_drop() {
        let (mut app, tx, _rx) = test_app();
        let path = temp_file("dropped.txt", b"dropped contents");

        app.handle_action(
            &Action::PasteBulk(path.to_string_lossy().to_string()),
            &tx,
        );
        assert!(app.input.is_valid());
        assert!(app.response.status_message.contains("via drop"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn submit_with_nothing_staged_is_rejected_with_upload_notice() {
        let (mut app, tx, mut rx) = test_app();
        app.handle_action(&Action::Submit, &tx);
        assert!(!app.response.loading);
        assert_eq!(app.notice.as_deref(), Some("Select a file first."));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submit_with_short_text_is_rejected_with_text_notice() {
        let (mut app, tx, mut rx) = test_app();
        app.handle_action(&Action::SetMode(Mode::Text), &tx);
        type_text(&mut app, &tx, "Hi");

        app.handle_action(&Action::Submit, &tx);
        assert!(!app.response.loading);
        assert_eq!(
            app.notice.as_deref(),
            Some("Type at least 5 characters to analyze.")
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn submit_while_loading_is_a_noop() {
        let (mut app, tx, mut rx) = test_app();
        app.response = ResponseState::in_flight();
        let before = app.response.clone();

        app.handle_action(&Action::Submit, &tx);
        assert_eq!(app.response, before);
        assert!(app.notice.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn edits_are_frozen_while_loading() {
        let (mut app, tx, _rx) = test_app();
        app.handle_action(&Action::SetMode(Mode::Text), &tx);
        type_text(&mut app, &tx, "hello");
        app.response = ResponseState::in_flight();

        app.handle_action(&Action::CharInput('!'), &tx);
        assert_eq!(app.text_entry.text(), "hello");
    }

    #[test]
    fn server_error_resolution_applies_the_error_reducer() {
        let (mut app, tx, _rx) = test_app();
        app.response = ResponseState::in_flight();

        app.handle_action(
            &Action::SubmissionResolved(Outcome::ServerError {
                status: 500,
                status_text: "Internal Server Error".to_string(),
                body: "Internal error".to_string(),
            }),
            &tx,
        );
        assert!(!app.response.loading);
        assert_eq!(app.response.classification, API_ERROR_MARKER);
        assert_eq!(app.response.email_subject, "Status: 500");
        assert_eq!(app.response.auto_response, "Internal error...");
    }

    #[test]
    fn drag_highlight_follows_pointer_edges_only() {
        let (mut app, tx, _rx) = test_app();
        app.dropzone.set_area(Rect::new(0, 0, 20, 10));

        app.handle_action(&Action::PointerMoved { column: 5, row: 5 }, &tx);
        assert!(app.input.drag_active());

        // Movement inside the zone does not re-toggle.
        app.handle_action(&Action::PointerMoved { column: 6, row: 5 }, &tx);
        assert!(app.input.drag_active());

        app.handle_action(&Action::PointerMoved { column: 50, row: 5 }, &tx);
        assert!(!app.input.drag_active());
    }

    #[tokio::test]
    async fn unreachable_backend_resolves_to_a_transport_error() {
        // Nothing listens on this port; the request fails fast with a
        // connect error and the loading flag resolves exactly once.
        let mut config = TriageConfig::default();
        config.api.base_url = "http://127.0.0.1:9".to_string();
        config.api.timeout_seconds = 2;
        let mut app = App::new(&config).expect("client builds");
        let (tx, mut rx) = mpsc::unbounded_channel();

        app.handle_action(&Action::SetMode(Mode::Text), &tx);
        type_text(&mut app, &tx, "please classify this text");
        app.handle_action(&Action::Submit, &tx);
        assert!(app.response.loading);

        let resolved = rx.recv().await.expect("submission resolves");
        assert!(matches!(resolved, Action::SubmissionResolved(_)));
        app.handle_action(&resolved, &tx);

        assert!(!app.response.loading);
        assert_eq!(app.response.classification, CONNECTION_ERROR_MARKER);
        assert!(!app.response.auto_response.is_empty());
    }
}
