//! Action enum — the central message bus for the TUI.
//! All user interactions and the submission result flow through here.

use triage_core::input::Mode;
use triage_core::response::Outcome;

/// Every possible action that can occur in the application.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Mode selection ──────────────────────────────────────
    /// Activate a specific input mode tab.
    SetMode(Mode),
    /// Switch to the other input mode.
    ToggleMode,

    // ── Global ──────────────────────────────────────────────
    /// Quit the application.
    Quit,
    /// Toggle help overlay.
    ToggleHelp,
    /// Show a blocking user-facing notice (invalid file, rejected submit).
    Notice(String),
    /// Enter text-input mode.
    EnterEditing,
    /// Leave text-input mode.
    LeaveEditing,
    /// A tick event for periodic redraws.
    Tick,

    // ── Text input ──────────────────────────────────────────
    /// A character was typed (only sent when in input mode).
    CharInput(char),
    /// Backspace pressed (only sent when in input mode).
    BackspaceInput,
    /// Delete word (Ctrl+W).
    DeleteWord,
    /// Enter in a text field: newline in the paste area, stage in the
    /// path field.
    NewlineInput,
    /// Accept the highlighted path suggestion (Tab).
    AcceptSuggestion,
    /// Bulk paste from bracketed paste mode. A dropped file arrives this
    /// way too, as a pasted path.
    PasteBulk(String),
    /// Navigate suggestions or move the text cursor.
    ScrollUp,
    ScrollDown,

    // ── Staging ─────────────────────────────────────────────
    /// Stage a candidate file for submission.
    StageFile { path: String, via_drop: bool },
    /// Pointer position changed (drives the drop-target highlight).
    PointerMoved { column: u16, row: u16 },

    // ── Submission ──────────────────────────────────────────
    /// Submit the staged input for classification.
    Submit,
    /// The in-flight request reached its terminal outcome. Sent exactly
    /// once per accepted submission.
    SubmissionResolved(Outcome),
}

/// Whether the app is in a text-input mode where raw keys should
/// be forwarded to the active component instead of interpreted as
/// global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal mode — keys are global shortcuts.
    Normal,
    /// Text input mode — keys go to the focused field.
    Editing,
}
