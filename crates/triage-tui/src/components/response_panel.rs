//! Response area: the status line, the classification and subject cards,
//! and the automatic reply panel. Pure view over `ResponseState`.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::components::{Component, ViewContext};
use crate::theme::Theme;

pub struct ResponsePanelComponent;

impl ResponsePanelComponent {
    pub fn new() -> Self {
        Self
    }

    fn card(title: &str, value: &str, accent: ratatui::style::Color, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(Theme::muted())
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let body = Paragraph::new(Span::styled(
            value,
            ratatui::style::Style::default().fg(accent),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(body, area);
    }
}

impl Component for ResponsePanelComponent {
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Status line
            Constraint::Length(4), // Classification + subject cards
            Constraint::Min(3),    // Automatic reply
        ])
        .split(area);

        let response = ctx.response;

        let status_style = if response.loading {
            Theme::loading()
        } else {
            Theme::muted()
        };
        let status = Line::from(vec![
            Span::styled("Status: ", Theme::header()),
            Span::styled(&response.status_message, status_style),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let cards = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);
        Self::card(
            "Classification",
            &response.classification,
            Theme::accent(),
            frame,
            cards[0],
        );
        Self::card(
            "Suggested subject",
            &response.email_subject,
            Theme::accent_secondary(),
            frame,
            cards[1],
        );

        let reply_block = Block::default()
            .title(" Automatic reply ")
            .title_style(Theme::muted())
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let reply = Paragraph::new(Span::styled(&response.auto_response, Theme::normal()))
            .wrap(Wrap { trim: false })
            .block(reply_block);
        frame.render_widget(reply, chunks[2]);
    }
}
