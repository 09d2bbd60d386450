//! Upload mode: the drop zone.
//!
//! Features:
//! - Drop target: a file dragged onto the terminal arrives as a pasted
//!   path and is staged with the same validation as explicit selection
//! - Path field: single-line with filesystem autocomplete
//! - Tab accepts path suggestions, arrows navigate, Enter stages
//! - Hover over the zone toggles the drop highlight

use std::cell::Cell;
use std::path::{Path, PathBuf};

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use triage_core::input::StagedInput;

use crate::action::Action;
use crate::components::{Component, ViewContext};
use crate::theme::Theme;

/// Maximum number of path suggestions to display.
const MAX_SUGGESTIONS: usize = 8;

pub struct DropzoneComponent {
    /// Current path input.
    pub path_input: String,
    /// Cursor position (byte offset) within the path field.
    pub cursor: usize,

    // ── Path suggestions ────────────────────────────────────
    /// Current filesystem suggestions based on path_input.
    suggestions: Vec<PathSuggestion>,
    /// Which suggestion is highlighted.
    suggestion_index: Option<usize>,
    /// The path input value that was last used to compute suggestions
    /// (avoids recomputing on every render).
    suggestions_for: String,

    /// Screen area of the zone as of the last render, for pointer
    /// hit-testing.
    area: Cell<Rect>,
}

/// A single path suggestion entry.
#[derive(Debug, Clone)]
struct PathSuggestion {
    /// The full absolute path.
    full_path: String,
    /// Just the filename/dirname component (for display).
    name: String,
    /// Whether this is a directory.
    is_dir: bool,
}

/// Expand a leading ~ to the home directory.
fn expand_tilde(input: &str) -> String {
    if input.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().to_string() + &input[1..];
        }
    }
    input.to_string()
}

/// Strip the quoting some terminals wrap dropped paths in.
fn unquote(input: &str) -> &str {
    let trimmed = input.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

impl DropzoneComponent {
    pub fn new() -> Self {
        let mut this = Self {
            path_input: "~/".to_string(),
            cursor: 2,
            suggestions: Vec::new(),
            suggestion_index: None,
            suggestions_for: String::new(),
            area: Cell::new(Rect::default()),
        };
        this.refresh_suggestions();
        this
    }

    /// Pre-fill the path field (from CLI args).
    pub fn set_path(&mut self, path: String) {
        self.cursor = path.len();
        self.path_input = path;
        self.refresh_suggestions();
    }

    /// Reset view state on a mode switch.
    pub fn reset(&mut self) {
        self.set_path("~/".to_string());
    }

    /// Whether the pointer position falls inside the zone.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        let area = self.area.get();
        column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height
    }

    #[cfg(test)]
    pub(crate) fn set_area(&self, area: Rect) {
        self.area.set(area);
    }

    /// Whether a pasted blob should be treated as a dropped file rather
    /// than literal text: a single line naming an existing file.
    fn is_dropped_path(text: &str) -> bool {
        if text.lines().count() != 1 {
            return false;
        }
        let candidate = expand_tilde(unquote(text));
        Path::new(&candidate).is_file()
    }

    // ── Path field editing ──────────────────────────────────

    fn clamp_cursor(&mut self) {
        if self.cursor > self.path_input.len() {
            self.cursor = self.path_input.len();
        }
    }

    fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        self.path_input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let prev = self.path_input[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.path_input.remove(prev);
            self.cursor = prev;
        }
    }

    fn delete_word(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let mut end = self.cursor;
            while end > 0 && self.path_input.as_bytes().get(end - 1) == Some(&b' ') {
                end -= 1;
            }
            let mut start = end;
            while start > 0 && self.path_input.as_bytes().get(start - 1) != Some(&b' ') {
                start -= 1;
            }
            self.path_input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        self.path_input.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    // ── Path suggestion logic ───────────────────────────────

    /// Refresh filesystem suggestions based on the current path_input.
    /// Called after every keystroke.
    fn refresh_suggestions(&mut self) {
        // Only compute if the input actually changed.
        if self.path_input == self.suggestions_for {
            return;
        }
        self.suggestions_for = self.path_input.clone();
        self.suggestion_index = None;
        self.suggestions.clear();

        let input = &self.path_input;
        if input.is_empty() {
            return;
        }

        let expanded = expand_tilde(input);
        let path = Path::new(&expanded);

        // Determine the parent directory to list, and the prefix to filter by.
        let (search_dir, prefix): (PathBuf, String) =
            if expanded.ends_with('/') || expanded.ends_with(std::path::MAIN_SEPARATOR) {
                // User typed a trailing slash — list contents of this directory.
                (path.to_path_buf(), String::new())
            } else if path.is_dir() && !input.contains('.') {
                // The current input IS a complete directory — list its contents.
                (path.to_path_buf(), String::new())
            } else {
                // Partial name — list parent, filter by filename prefix.
                let parent = path.parent().unwrap_or(Path::new("/"));
                let file_prefix = path
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default();
                (parent.to_path_buf(), file_prefix)
            };

        let entries = match std::fs::read_dir(&search_dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let prefix_lower = prefix.to_lowercase();

        let mut results: Vec<PathSuggestion> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files unless the user is explicitly typing a dot.
                if name.starts_with('.') && !prefix.starts_with('.') {
                    return None;
                }

                if !prefix.is_empty() && !name.to_lowercase().starts_with(&prefix_lower) {
                    return None;
                }

                let full_path = entry.path();
                let is_dir = full_path.is_dir();

                // Directories are always listed (to keep drilling down);
                // files only when the service could accept them.
                if !is_dir && triage_core::input::mime_type_for(&full_path).is_none() {
                    return None;
                }

                Some(PathSuggestion {
                    full_path: full_path.to_string_lossy().to_string(),
                    name,
                    is_dir,
                })
            })
            .collect();

        // Sort: directories first, then alphabetically.
        results.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        results.truncate(MAX_SUGGESTIONS);
        self.suggestions = results;
    }

    /// Accept the currently highlighted suggestion (or the first one).
    fn accept_suggestion(&mut self) {
        let idx = self.suggestion_index.unwrap_or(0);
        if let Some(suggestion) = self.suggestions.get(idx) {
            let mut new_path = suggestion.full_path.clone();
            // If it's a directory, append a slash so the user can keep drilling.
            if suggestion.is_dir && !new_path.ends_with('/') {
                new_path.push('/');
            }
            self.path_input = new_path;
            self.cursor = self.path_input.len();
            self.suggestions_for.clear();
            self.suggestions.clear();
            self.suggestion_index = None;
            self.refresh_suggestions();
        }
    }

    fn has_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Stage whatever the path field currently names.
    fn try_stage(&mut self) -> Option<Action> {
        self.suggestions.clear();
        self.suggestion_index = None;

        if self.path_input.is_empty() {
            return Some(Action::Notice("Enter a file path first.".to_string()));
        }
        Some(Action::StageFile {
            path: expand_tilde(&self.path_input),
            via_drop: false,
        })
    }

    /// Render the path input field with cursor.
    fn render_path_field(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" File path ")
            .title_style(Theme::muted())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let text = &self.path_input;
        let pos = self.cursor.min(text.len());
        let (before, after) = text.split_at(pos);
        let cursor_char = match after.chars().next() {
            Some(c) => c.to_string(),
            None => " ".to_string(),
        };
        let rest = if after.len() > cursor_char.len() {
            &after[cursor_char.len()..]
        } else {
            ""
        };
        let display = Paragraph::new(Line::from(vec![
            Span::styled(before, Theme::normal()),
            Span::styled(
                cursor_char,
                Style::default().fg(Theme::bg()).bg(Theme::accent()),
            ),
            Span::styled(rest, Theme::normal()),
        ]));

        frame.render_widget(display.block(block), area);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect) {
        let suggestion_block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
            .border_style(Theme::border());

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let is_highlighted = self.suggestion_index == Some(i);
                let icon = if s.is_dir { "/" } else { " " };

                let style = if is_highlighted {
                    Style::default()
                        .fg(Theme::bg())
                        .bg(Theme::accent())
                        .add_modifier(Modifier::BOLD)
                } else if s.is_dir {
                    Style::default().fg(Theme::accent())
                } else {
                    Theme::normal()
                };

                ListItem::new(Line::from(vec![Span::styled(
                    format!(" {}{} ", s.name, icon),
                    style,
                )]))
            })
            .collect();

        let list = List::new(items).block(suggestion_block);
        frame.render_widget(list, area);
    }
}

impl Component for DropzoneComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::CharInput(c) => {
                self.insert_char(*c);
                self.refresh_suggestions();
                None
            }
            Action::BackspaceInput => {
                self.delete_char();
                self.refresh_suggestions();
                None
            }
            Action::DeleteWord => {
                self.delete_word();
                self.refresh_suggestions();
                None
            }
            Action::AcceptSuggestion => {
                self.accept_suggestion();
                None
            }
            Action::ScrollDown => {
                if self.has_suggestions() {
                    let max = self.suggestions.len();
                    self.suggestion_index = Some(match self.suggestion_index {
                        None => 0,
                        Some(i) => (i + 1).min(max - 1),
                    });
                }
                None
            }
            Action::ScrollUp => {
                if self.has_suggestions() {
                    self.suggestion_index = match self.suggestion_index {
                        None | Some(0) => None,
                        Some(i) => Some(i - 1),
                    };
                }
                None
            }
            Action::NewlineInput => {
                // Enter: accept a navigated suggestion, otherwise stage the
                // named file.
                if self.has_suggestions() && self.suggestion_index.is_some() {
                    self.accept_suggestion();
                    return None;
                }
                self.try_stage()
            }
            Action::PasteBulk(text) => {
                if Self::is_dropped_path(text) {
                    // The terminal delivered a dropped file as a pasted path.
                    return Some(Action::StageFile {
                        path: expand_tilde(unquote(text)),
                        via_drop: true,
                    });
                }
                // Literal paste into the path field: first line only.
                let line = text.lines().next().unwrap_or("").to_string();
                if !line.is_empty() {
                    self.insert_str(&line);
                    self.refresh_suggestions();
                }
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let drag_active = ctx.input.drag_active();

        let border_style = if drag_active {
            Theme::drop_active()
        } else {
            Theme::border()
        };
        let zone = Block::default()
            .title(" Drop zone ")
            .title_style(if drag_active {
                Theme::drop_active()
            } else {
                Theme::title()
            })
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = zone.inner(area);
        frame.render_widget(zone, area);
        self.area.set(area);

        let suggestion_height = if self.has_suggestions() {
            self.suggestions.len() as u16 + 1
        } else {
            0
        };

        let chunks = Layout::vertical([
            Constraint::Length(2),                 // Hint
            Constraint::Length(3),                 // Path input
            Constraint::Length(suggestion_height), // Suggestions dropdown
            Constraint::Length(2),                 // Selected file info
            Constraint::Min(0),
        ])
        .split(inner);

        let hint = if drag_active {
            Span::styled("Release to drop the file here...", Theme::drop_active())
        } else {
            Span::styled(
                "Drag a file onto the terminal (.pdf or .txt), or type a path and press Enter.",
                Theme::dim(),
            )
        };
        frame.render_widget(
            Paragraph::new(Line::from(hint)).wrap(Wrap { trim: true }),
            chunks[0],
        );

        self.render_path_field(frame, chunks[1]);

        if self.has_suggestions() {
            self.render_suggestions(frame, chunks[2]);
        }

        if let Some(StagedInput::File {
            name, byte_size, ..
        }) = ctx.input.staged()
        {
            let info = Line::from(vec![
                Span::styled("Selected: ", Theme::muted()),
                Span::styled(name.as_str(), Theme::header()),
                Span::styled(
                    format!(" ({:.2} KB)", *byte_size as f64 / 1024.0),
                    Theme::muted(),
                ),
            ]);
            frame.render_widget(Paragraph::new(info), chunks[3]);
        }
    }
}
