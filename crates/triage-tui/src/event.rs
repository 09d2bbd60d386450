//! Terminal event handling — captures keyboard, mouse, paste, and resize
//! events from crossterm and dispatches them as Actions.
//!
//! The handler operates in two modes:
//! - Normal: keys are mapped to global shortcuts (quit, switch mode, submit).
//! - Editing: keys are forwarded as raw CharInput/BackspaceInput so the path
//!   field and the paste area can receive typed characters.
//!
//! The current InputMode is shared between the App and EventHandler via
//! an Arc<AtomicU8>. Mouse movement is forwarded so the App can drive the
//! drop-target highlight; a file dragged onto the terminal arrives as a
//! bracketed paste of its path.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use triage_core::input::Mode;

use crate::action::{Action, InputMode};

/// Encode InputMode as u8 for atomic sharing.
const MODE_NORMAL: u8 = 0;
const MODE_EDITING: u8 = 1;

/// Shared flag the App sets so the EventHandler knows which keymap to use.
pub type InputModeFlag = Arc<AtomicU8>;

pub fn new_input_mode_flag() -> InputModeFlag {
    Arc::new(AtomicU8::new(MODE_EDITING))
}

pub fn set_input_mode(flag: &InputModeFlag, mode: InputMode) {
    let val = match mode {
        InputMode::Normal => MODE_NORMAL,
        InputMode::Editing => MODE_EDITING,
    };
    flag.store(val, Ordering::Relaxed);
}

fn get_input_mode(flag: &InputModeFlag) -> InputMode {
    match flag.load(Ordering::Relaxed) {
        MODE_EDITING => InputMode::Editing,
        _ => InputMode::Normal,
    }
}

/// Event loop that reads terminal events and sends Actions.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Action>,
    tick_rate: Duration,
    mode_flag: InputModeFlag,
}

impl EventHandler {
    pub fn new(
        tx: mpsc::UnboundedSender<Action>,
        tick_rate: Duration,
        mode_flag: InputModeFlag,
    ) -> Self {
        Self {
            tx,
            tick_rate,
            mode_flag,
        }
    }

    /// Run the event loop. This blocks and should be spawned in a task.
    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.tick_rate);

        loop {
            let action = tokio::select! {
                _ = interval.tick() => {
                    Some(Action::Tick)
                }
                result = tokio::task::spawn_blocking({
                    || {
                        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                            event::read().ok()
                        } else {
                            None
                        }
                    }
                }) => {
                    match result {
                        Ok(Some(event)) => self.map_event(event),
                        _ => None,
                    }
                }
            };

            if let Some(action) = action {
                if self.tx.send(action).is_err() {
                    break;
                }
            }
        }
    }

    fn map_event(&self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.map_key(key),
            // Dropping a file onto most terminals pastes its path; the App
            // decides whether a paste is a drop or literal text.
            Event::Paste(text) => Some(Action::PasteBulk(text)),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved => Some(Action::PointerMoved {
                    column: mouse.column,
                    row: mouse.row,
                }),
                _ => None,
            },
            Event::Resize(_, _) => Some(Action::Tick),
            _ => None,
        }
    }

    fn map_key(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits regardless of mode.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match get_input_mode(&self.mode_flag) {
            InputMode::Editing => self.map_key_editing(key),
            InputMode::Normal => self.map_key_normal(key),
        }
    }

    /// Key mapping when a text field is focused. Most keys become character
    /// input; only a few are reserved.
    fn map_key_editing(&self, key: KeyEvent) -> Option<Action> {
        // Ctrl shortcuts that work in editing mode.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => Some(Action::DeleteWord),
                KeyCode::Char('s') => Some(Action::Submit),
                KeyCode::Enter => Some(Action::Submit),
                _ => None,
            };
        }

        // Alt+Enter also submits (some terminals send this instead of Ctrl+Enter).
        if key.modifiers.contains(KeyModifiers::ALT) && key.code == KeyCode::Enter {
            return Some(Action::Submit);
        }

        match key.code {
            // Escape returns to normal mode.
            KeyCode::Esc => Some(Action::LeaveEditing),
            // Tab accepts the highlighted path suggestion.
            KeyCode::Tab | KeyCode::BackTab => Some(Action::AcceptSuggestion),
            // Enter inserts a newline in the paste area, stages in the
            // path field. The component decides.
            KeyCode::Enter => Some(Action::NewlineInput),
            // Arrow up/down scroll / navigate.
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            // Backspace deletes.
            KeyCode::Backspace => Some(Action::BackspaceInput),
            // Any printable character is forwarded.
            KeyCode::Char(c) => Some(Action::CharInput(c)),
            _ => None,
        }
    }

    /// Key mapping in normal mode — global shortcuts.
    fn map_key_normal(&self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::ToggleHelp),
            KeyCode::Right | KeyCode::Left | KeyCode::Tab | KeyCode::BackTab => {
                Some(Action::ToggleMode)
            }
            KeyCode::Char('1') => Some(Action::SetMode(Mode::Upload)),
            KeyCode::Char('2') => Some(Action::SetMode(Mode::Text)),
            KeyCode::Enter | KeyCode::Char('s') => Some(Action::Submit),
            KeyCode::Char('i') | KeyCode::Char('e') | KeyCode::Esc => Some(Action::EnterEditing),
            _ => None,
        }
    }
}
