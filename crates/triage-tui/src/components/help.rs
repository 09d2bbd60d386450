//! Help overlay — keybinding reference.

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::action::Action;
use crate::components::{Component, ViewContext};
use crate::theme::Theme;

pub struct HelpComponent {
    pub visible: bool,
}

impl HelpComponent {
    pub fn new() -> Self {
        Self { visible: false }
    }

    fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
        let vertical = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(area);

        let horizontal = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .flex(Flex::Center)
        .split(vertical[1]);

        horizontal[1]
    }
}

impl Component for HelpComponent {
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        match action {
            Action::ToggleHelp => {
                self.visible = !self.visible;
                None
            }
            Action::Tick | Action::PointerMoved { .. } => None,
            _ if self.visible => {
                // Any key closes help.
                self.visible = false;
                None
            }
            _ => None,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &ViewContext) {
        if !self.visible {
            return;
        }

        let dialog = Self::centered_rect(area, 58, 18);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(" Help — Keybindings ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::accent()));

        let help_text = vec![
            Line::from(""),
            key_line("q / Ctrl+C", "Quit"),
            key_line("?", "Toggle this help"),
            key_line("Esc", "Toggle typing / shortcuts"),
            key_line("1 / 2", "Upload file / paste text mode"),
            key_line("Tab, Left / Right", "Switch mode (shortcuts)"),
            key_line("Ctrl+S / Ctrl+Enter", "Submit for analysis"),
            Line::from(""),
            Line::from(Span::styled("── Upload mode ──", Theme::header())),
            Line::from(""),
            key_line("Drop a file", "Stages it (.pdf or .txt only)"),
            key_line("Type a path + Enter", "Stages the named file"),
            key_line("Tab / Up / Down", "Path suggestions"),
            Line::from(""),
            Line::from(Span::styled("── Text mode ──", Theme::header())),
            Line::from(""),
            key_line("Type or paste", "At least 5 characters"),
        ];

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, dialog);
    }
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<22}", key), Theme::selected()),
        Span::styled(desc, Theme::normal()),
    ])
}
