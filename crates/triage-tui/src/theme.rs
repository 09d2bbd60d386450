//! Color scheme and styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// The color palette for triage's TUI.
///
/// Uses RGB colors for a subdued look in the style of lazygit and similar
/// modern terminal UIs.
pub struct Theme;

impl Theme {
    // ── Base colors ─────────────────────────────────────────
    pub fn bg() -> Color {
        Color::Reset
    }

    pub fn fg() -> Color {
        Color::Rgb(200, 200, 200)
    }

    pub fn fg_dim() -> Color {
        Color::Rgb(100, 100, 100)
    }

    pub fn fg_muted() -> Color {
        Color::Rgb(140, 140, 140)
    }

    // ── Accent colors ───────────────────────────────────────
    pub fn accent() -> Color {
        Color::Rgb(110, 170, 255)
    }

    pub fn accent_secondary() -> Color {
        Color::Rgb(180, 130, 240)
    }

    pub fn success() -> Color {
        Color::Rgb(80, 200, 120)
    }

    pub fn warning() -> Color {
        Color::Rgb(230, 180, 80)
    }

    pub fn error() -> Color {
        Color::Rgb(240, 80, 80)
    }

    // ── Structural colors ───────────────────────────────────
    pub fn border_color() -> Color {
        Color::Rgb(60, 60, 60)
    }

    // ── Composite styles ────────────────────────────────────

    pub fn title() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::fg()).add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::fg())
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::fg_dim())
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::fg_muted())
    }

    pub fn border() -> Style {
        Style::default().fg(Self::border_color())
    }

    pub fn key_hint() -> Style {
        Style::default().fg(Self::accent())
    }

    pub fn notice() -> Style {
        Style::default()
            .fg(Self::error())
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading() -> Style {
        Style::default().fg(Self::warning())
    }

    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::accent())
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Self::fg_dim())
    }

    /// Border of the drop zone while a pointer hovers over it.
    pub fn drop_active() -> Style {
        Style::default()
            .fg(Self::success())
            .add_modifier(Modifier::BOLD)
    }
}
