//! Status bar at the bottom of the TUI.
//!
//! Shows the active blocking notice when one exists, otherwise a key-hint
//! line, plus the mode badge.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use triage_core::input::Mode;

use crate::components::{Component, ViewContext};
use crate::theme::Theme;

pub struct StatusBarComponent;

impl StatusBarComponent {
    pub fn new() -> Self {
        Self
    }

    /// Short mode name for the pill badge.
    fn mode_badge(mode: Mode) -> &'static str {
        match mode {
            Mode::Upload => "Upload",
            Mode::Text => "Text",
        }
    }
}

impl Component for StatusBarComponent {
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let width = area.width as usize;

        // Right side: compact key hints. Widths are counted in characters;
        // the separators are multibyte.
        let hints = "enter·tab·?·q";
        let hints_len = hints.chars().count() + 1; // +1 for trailing space

        let badge = Self::mode_badge(ctx.input.mode());
        let badge_len = badge.chars().count() + 2; // spaces around badge

        let (message, style) = match ctx.notice {
            Some(notice) => (notice.to_string(), Theme::notice()),
            None if ctx.response.loading => ("Analyzing...".to_string(), Theme::loading()),
            None => (
                "Esc toggles shortcuts · enter submits".to_string(),
                Theme::dim(),
            ),
        };

        // Truncate message to remaining space
        let msg_budget = width
            .saturating_sub(badge_len)
            .saturating_sub(hints_len)
            .saturating_sub(4); // separators and spacing

        let msg = if message.chars().count() > msg_budget {
            if msg_budget > 3 {
                let cut: String = message.chars().take(msg_budget - 3).collect();
                format!("{cut}...")
            } else {
                String::new()
            }
        } else {
            message
        };

        // Pad to push hints to the right edge
        let used = badge_len + 2 + msg.chars().count();
        let pad = width.saturating_sub(used + hints_len);

        let line = Line::from(vec![
            Span::styled(format!(" {} ", badge), Theme::muted()),
            Span::styled("  ", Theme::dim()),
            Span::styled(msg, style),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Theme::key_hint()),
            Span::raw(" "),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
