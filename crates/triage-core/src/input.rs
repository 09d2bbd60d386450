//! Input staging — which of the two input modes is active, what content
//! is currently staged for submission, and whether that content is valid.
//!
//! Exactly one `StagedInput` exists at a time. It is replaced wholesale on
//! every new selection and cleared on every mode switch; mode and input can
//! never disagree because the manager owns both.

use std::path::Path;

use crate::error::{Result, TriageError};

/// Mime types the classification service accepts.
pub const ALLOWED_MIME_TYPES: &[&str] = &["application/pdf", "text/plain"];

/// Minimum trimmed length for pasted text to be submittable.
pub const MIN_TEXT_CHARS: usize = 5;

/// Filename the pasted text travels under in the multipart form.
pub const TEXT_ATTACHMENT_NAME: &str = "email_content.txt";

/// The two mutually exclusive input methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Upload,
    Text,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Upload, Mode::Text]
    }

    /// Display label for the mode tab.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Upload => "1.Upload file",
            Mode::Text => "2.Paste text",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Mode::Upload => 0,
            Mode::Text => 1,
        }
    }

    /// The other mode (there are exactly two).
    pub fn other(&self) -> Mode {
        match self {
            Mode::Upload => Mode::Text,
            Mode::Text => Mode::Upload,
        }
    }
}

/// The currently held, not-yet-submitted payload content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedInput {
    /// A file read from disk (Upload mode only).
    File {
        name: String,
        byte_size: u64,
        mime_type: String,
        content: Vec<u8>,
    },
    /// Pasted or typed text (Text mode only).
    Text { content: String },
}

/// The outbound multipart payload built from the staged input.
///
/// One form field named `file`; in Text mode the content travels as a
/// plain-text attachment under a fixed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPayload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Resolve the mime type for a candidate file from its extension.
/// Returns `None` for anything the service does not accept.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Owns the input mode, the staged input, and the transient drag-hover flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputManager {
    mode: Mode,
    staged: Option<StagedInput>,
    /// Transient, drop-target highlight only. Not part of the payload state.
    drag_active: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            mode: Mode::Upload,
            staged: None,
            drag_active: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn staged(&self) -> Option<&StagedInput> {
        self.staged.as_ref()
    }

    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Switch input mode. Clears the staged input unconditionally so the
    /// mode and payload can never be mismatched. The caller is responsible
    /// for rejecting the switch while a submission is in flight.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.staged = None;
        self.drag_active = false;
    }

    /// Stage a file picked explicitly. Validates the extension before
    /// touching the filesystem; on rejection the staged input is left unset.
    pub fn select_file(&mut self, path: &Path) -> Result<()> {
        let staged = Self::read_candidate(path)?;
        self.staged = Some(staged);
        Ok(())
    }

    /// Stage a file that arrived via drag-and-drop. Same contract as
    /// [`select_file`](Self::select_file), and additionally clears the
    /// drag-hover flag.
    pub fn drop_file(&mut self, path: &Path) -> Result<()> {
        self.drag_active = false;
        self.select_file(path)
    }

    fn read_candidate(path: &Path) -> Result<StagedInput> {
        let name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let Some(mime_type) = mime_type_for(path) else {
            return Err(TriageError::InvalidFileType(name));
        };

        let content = std::fs::read(path)?;
        Ok(StagedInput::File {
            byte_size: content.len() as u64,
            name,
            mime_type: mime_type.to_string(),
            content,
        })
    }

    /// Toggle the drop-target highlight. Driven by pointer enter/leave
    /// edges only; repeated hover events inside the zone must not call this.
    pub fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }

    /// Replace the staged text wholesale. No validation at keystroke time;
    /// validity is checked at submit and for button enablement. Ignored
    /// outside Text mode.
    pub fn set_text(&mut self, content: String) {
        if self.mode == Mode::Text {
            self.staged = Some(StagedInput::Text { content });
        }
    }

    /// Name of the currently staged file, if any.
    pub fn staged_file_name(&self) -> Option<&str> {
        match self.staged.as_ref()? {
            StagedInput::File { name, .. } => Some(name),
            StagedInput::Text { .. } => None,
        }
    }

    /// Whether the staged input satisfies the current mode's rule:
    /// a staged file of an allowed type, or text of trimmed length ≥ 5.
    pub fn is_valid(&self) -> bool {
        match (self.mode, self.staged.as_ref()) {
            (Mode::Upload, Some(StagedInput::File { mime_type, .. })) => {
                ALLOWED_MIME_TYPES.contains(&mime_type.as_str())
            }
            (Mode::Text, Some(StagedInput::Text { content })) => {
                content.trim().chars().count() >= MIN_TEXT_CHARS
            }
            _ => false,
        }
    }

    /// Submit-time precondition check. The error carries the mode-specific
    /// user-facing notice.
    pub fn validate_for_submit(&self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        Err(TriageError::Validation(
            self.rejection_notice().to_string(),
        ))
    }

    /// The blocking notice shown when submit is attempted with invalid input.
    pub fn rejection_notice(&self) -> &'static str {
        match self.mode {
            Mode::Upload => "Select a file first.",
            Mode::Text => "Type at least 5 characters to analyze.",
        }
    }

    /// Build the outbound payload from the staged input, or `None` when
    /// nothing is staged.
    pub fn to_payload(&self) -> Option<SubmitPayload> {
        match self.staged.as_ref()? {
            StagedInput::File {
                name,
                mime_type,
                content,
                ..
            } => Some(SubmitPayload {
                file_name: name.clone(),
                mime_type: mime_type.clone(),
                bytes: content.clone(),
            }),
            StagedInput::Text { content } => Some(SubmitPayload {
                file_name: TEXT_ATTACHMENT_NAME.to_string(),
                mime_type: "text/plain".to_string(),
                bytes: content.clone().into_bytes(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("triage-test-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    #[test]
    fn mime_resolution_accepts_only_pdf_and_txt() {
        assert_eq!(
            mime_type_for(Path::new("report.pdf")),
            Some("application/pdf")
        );
        assert_eq!(mime_type_for(Path::new("NOTES.TXT")), Some("text/plain"));
        assert_eq!(mime_type_for(Path::new("image.png")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn select_file_stages_allowed_type() {
        let path = temp_file("report.pdf", b"%PDF-1.4 fake");
        let mut input = InputManager::new();
        input.select_file(&path).expect("pdf should be accepted");

        match input.staged() {
            Some(StagedInput::File {
                name,
                byte_size,
                mime_type,
                content,
            }) => {
                assert!(name.ends_with("report.pdf"));
                assert_eq!(*byte_size, 13);
                assert_eq!(mime_type, "application/pdf");
                assert_eq!(content, b"%PDF-1.4 fake");
            }
            other => panic!("expected staged file, got {other:?}"),
        }
        assert!(input.is_valid());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn select_file_rejects_disallowed_type_and_stages_nothing() {
        let path = temp_file("image.png", b"\x89PNG");
        let mut input = InputManager::new();
        let err = input.select_file(&path).unwrap_err();
        assert!(matches!(err, TriageError::InvalidFileType(_)));
        assert!(input.staged().is_none());
        assert!(!input.is_valid());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn drop_file_clears_drag_highlight() {
        let path = temp_file("dropped.txt", b"hello world");
        let mut input = InputManager::new();
        input.set_drag_active(true);
        input.drop_file(&path).expect("txt should be accepted");
        assert!(!input.drag_active());
        assert!(input.is_valid());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejected_drop_also_clears_drag_highlight() {
        let path = temp_file("bad.exe", b"MZ");
        let mut input = InputManager::new();
        input.set_drag_active(true);
        assert!(input.drop_file(&path).is_err());
        assert!(!input.drag_active());
        assert!(input.staged().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn mode_switch_clears_staged_input() {
        let path = temp_file("keep.txt", b"some text");
        let mut input = InputManager::new();
        input.select_file(&path).unwrap();
        assert!(input.staged().is_some());

        input.set_mode(Mode::Text);
        assert_eq!(input.mode(), Mode::Text);
        assert!(input.staged().is_none());

        input.set_text("hello there".to_string());
        input.set_mode(Mode::Upload);
        assert!(input.staged().is_none());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn text_validity_requires_five_trimmed_chars() {
        let mut input = InputManager::new();
        input.set_mode(Mode::Text);

        assert!(!input.is_valid()); // nothing staged yet

        input.set_text("Hi".to_string());
        assert!(!input.is_valid());

        input.set_text("    ab    ".to_string());
        assert!(!input.is_valid()); // trimmed length 2

        input.set_text("  hello  ".to_string());
        assert!(input.is_valid()); // trimmed length 5
    }

    #[test]
    fn set_text_is_ignored_in_upload_mode() {
        let mut input = InputManager::new();
        input.set_text("should not stage".to_string());
        assert!(input.staged().is_none());
    }

    #[test]
    fn submit_validation_carries_mode_specific_notice() {
        let mut input = InputManager::new();
        let err = input.validate_for_submit().unwrap_err();
        assert_eq!(err.to_string(), "Select a file first.");

        input.set_mode(Mode::Text);
        input.set_text("Hi".to_string());
        let err = input.validate_for_submit().unwrap_err();
        assert_eq!(err.to_string(), "Type at least 5 characters to analyze.");
    }

    #[test]
    fn text_payload_is_fixed_plain_text_attachment() {
        let mut input = InputManager::new();
        input.set_mode(Mode::Text);
        input.set_text("please classify this".to_string());

        let payload = input.to_payload().expect("payload for staged text");
        assert_eq!(payload.file_name, TEXT_ATTACHMENT_NAME);
        assert_eq!(payload.mime_type, "text/plain");
        assert_eq!(payload.bytes, b"please classify this");
    }

    #[test]
    fn file_payload_preserves_original_name_and_bytes() {
        let path = temp_file("invoice.pdf", b"%PDF bytes");
        let mut input = InputManager::new();
        input.select_file(&path).unwrap();

        let payload = input.to_payload().expect("payload for staged file");
        assert!(payload.file_name.ends_with("invoice.pdf"));
        assert_eq!(payload.mime_type, "application/pdf");
        assert_eq!(payload.bytes, b"%PDF bytes");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn new_selection_replaces_staged_input_wholesale() {
        let first = temp_file("first.txt", b"first contents");
        let second = temp_file("second.txt", b"second");
        let mut input = InputManager::new();
        input.select_file(&first).unwrap();
        input.select_file(&second).unwrap();

        match input.staged() {
            Some(StagedInput::File { name, content, .. }) => {
                assert!(name.ends_with("second.txt"));
                assert_eq!(content, b"second");
            }
            other => panic!("expected staged file, got {other:?}"),
        }
        let _ = std::fs::remove_file(&first);
        let _ = std::fs::remove_file(&second);
    }
}
