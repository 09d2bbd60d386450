//! Text mode: the paste area.
//!
//! Multi-line text field with cursor and scrolling viewport, plus the
//! character counter. The component owns only the editing buffer; after
//! every edit the App mirrors the buffer into the staged input wholesale,
//! so validation stays a pure question on the core side.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use triage_core::input::MIN_TEXT_CHARS;

use crate::action::Action;
use crate::components::{Component, ViewContext};
use crate::theme::Theme;

pub struct TextEntryComponent {
    text: String,
    /// Cursor position (byte offset).
    cursor: usize,
    /// Scroll offset (first visible logical line).
    scroll: usize,
}

impl TextEntryComponent {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Pre-fill the buffer (from CLI args).
    pub fn set_text(&mut self, text: String) {
        self.cursor = text.len();
        self.text = text;
        self.ensure_cursor_visible();
    }

    /// Reset view state on a mode switch.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
    }

    fn insert_char(&mut self, c: char) {
        self.clamp_cursor();
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.ensure_cursor_visible();
    }

    fn delete_char(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.remove(prev);
            self.cursor = prev;
            self.ensure_cursor_visible();
        }
    }

    fn delete_word(&mut self) {
        self.clamp_cursor();
        if self.cursor > 0 {
            let mut end = self.cursor;
            while end > 0 && self.text.as_bytes().get(end - 1) == Some(&b' ') {
                end -= 1;
            }
            let mut start = end;
            while start > 0 && self.text.as_bytes().get(start - 1) != Some(&b' ') {
                start -= 1;
            }
            self.text.drain(start..self.cursor);
            self.cursor = start;
            self.ensure_cursor_visible();
        }
    }

    fn insert_str(&mut self, s: &str) {
        self.clamp_cursor();
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.ensure_cursor_visible();
    }

    /// Line number and character column of the cursor.
    fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..self.cursor.min(self.text.len())];
        let line = before.matches('\n').count();
        let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
        let col = before[line_start..].chars().count();
        (line, col)
    }

    /// Byte offset of the character at `col` within `line`, clamped to the
    /// end of the line. Columns are counted in characters so that vertical
    /// movement can never land mid-character in multibyte text.
    fn byte_offset_at_col(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn cursor_up(&mut self) {
        let (line, col) = self.cursor_line_col();
        if line == 0 {
            return;
        }
        let lines: Vec<&str> = self.text.split('\n').collect();
        let prev_line = lines[line - 1];
        let prev_line_start: usize = lines[..line - 1].iter().map(|l| l.len() + 1).sum();
        self.cursor = prev_line_start + Self::byte_offset_at_col(prev_line, col);
        self.ensure_cursor_visible();
    }

    fn cursor_down(&mut self) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let (line, col) = self.cursor_line_col();
        if line + 1 >= lines.len() {
            return;
        }
        let next_line = lines[line + 1];
        let next_line_start: usize = lines[..line + 1].iter().map(|l| l.len() + 1).sum();
        self.cursor = next_line_start + Self::byte_offset_at_col(next_line, col);
        self.ensure_cursor_visible();
    }

    /// Keep the cursor's line inside a conservative viewport estimate;
    /// render adjusts further with the real height.
    fn ensure_cursor_visible(&mut self) {
        let (cursor_line, _) = self.cursor_line_col();
        if cursor_line < self.scroll {
            self.scroll = cursor_line;
        }
        let estimated_viewport = 6usize;
        if cursor_line >= self.scroll + estimated_viewport {
            self.scroll = cursor_line.saturating_sub(estimated_viewport - 1);
        }
    }
}

impl Component for TextEntryComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::CharInput(c) => {
                self.insert_char(*c);
                None
            }
            Action::BackspaceInput => {
                self.delete_char();
                None
            }
            Action::DeleteWord => {
                self.delete_word();
                None
            }
            Action::NewlineInput => {
                self.insert_char('\n');
                None
            }
            Action::PasteBulk(text) => {
                self.insert_str(text);
                None
            }
            Action::ScrollUp => {
                self.cursor_up();
                None
            }
            Action::ScrollDown => {
                self.cursor_down();
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &ViewContext) {
        let chunks = Layout::vertical([
            Constraint::Min(4),    // Text area
            Constraint::Length(1), // Character counter
        ])
        .split(area);

        let char_count = self.text.chars().count();
        let counter_style = if self.text.trim().chars().count() >= MIN_TEXT_CHARS {
            Theme::muted()
        } else {
            Theme::dim()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("Characters: {char_count} (minimum {MIN_TEXT_CHARS})"),
                counter_style,
            )),
            chunks[1],
        );

        let block = Block::default()
            .title(" Email text ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        if self.text.is_empty() {
            let placeholder = Paragraph::new(Span::styled(
                "Paste the email or document text here for analysis...",
                Theme::dim(),
            ))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(placeholder, chunks[0]);
            return;
        }

        // Render logical lines with the cursor highlighted, scrolled so the
        // cursor stays visible.
        let inner_height = block.inner(chunks[0]).height as usize;
        let (cursor_line, cursor_col) = self.cursor_line_col();
        let scroll = {
            let mut s = self.scroll;
            if cursor_line < s {
                s = cursor_line;
            }
            if inner_height > 0 && cursor_line >= s + inner_height {
                s = cursor_line - inner_height + 1;
            }
            s
        };

        let mut rendered: Vec<Line> = Vec::new();
        for (i, line) in self.text.split('\n').enumerate().skip(scroll) {
            if rendered.len() >= inner_height.max(1) {
                break;
            }
            if i == cursor_line {
                let col = Self::byte_offset_at_col(line, cursor_col);
                let (before, after) = line.split_at(col);
                let cursor_char = match after.chars().next() {
                    Some(c) => c.to_string(),
                    None => " ".to_string(),
                };
                let rest = if after.len() > cursor_char.len() {
                    &after[cursor_char.len()..]
                } else {
                    ""
                };
                rendered.push(Line::from(vec![
                    Span::styled(before, Theme::normal()),
                    Span::styled(
                        cursor_char,
                        Style::default().fg(Theme::bg()).bg(Theme::accent()),
                    ),
                    Span::styled(rest, Theme::normal()),
                ]));
            } else {
                rendered.push(Line::from(Span::styled(line, Theme::normal())));
            }
        }

        frame.render_widget(Paragraph::new(rendered).block(block), chunks[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(entry: &mut TextEntryComponent, text: &str) {
        for c in text.chars() {
            entry.handle_action(&Action::CharInput(c));
        }
    }

    #[test]
    fn cursor_up_over_multibyte_line_lands_on_char_boundary() {
        let mut entry = TextEntryComponent::new();
        type_str(&mut entry, "éééé");
        entry.handle_action(&Action::NewlineInput);
        type_str(&mut entry, "abc");

        // Column 3 on the previous line is the start of the fourth 'é',
        // not byte 3 (which is mid-character).
        entry.handle_action(&Action::ScrollUp);
        entry.handle_action(&Action::CharInput('x'));
        assert_eq!(entry.text(), "éééxé\nabc");
    }

    #[test]
    fn cursor_down_from_multibyte_line_clamps_to_line_end() {
        let mut entry = TextEntryComponent::new();
        type_str(&mut entry, "ééééé");
        entry.handle_action(&Action::NewlineInput);
        type_str(&mut entry, "ab");

        entry.handle_action(&Action::ScrollUp);
        entry.handle_action(&Action::ScrollDown);
        entry.handle_action(&Action::CharInput('x'));
        assert_eq!(entry.text(), "ééééé\nabx");
    }

    #[test]
    fn cursor_column_is_counted_in_characters() {
        let mut entry = TextEntryComponent::new();
        type_str(&mut entry, "éé");
        let (line, col) = entry.cursor_line_col();
        assert_eq!((line, col), (0, 2));

        entry.handle_action(&Action::NewlineInput);
        type_str(&mut entry, "wxyz");
        let (line, col) = entry.cursor_line_col();
        assert_eq!((line, col), (1, 4));
    }
}
