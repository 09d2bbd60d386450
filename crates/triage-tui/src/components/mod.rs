//! Component trait and all TUI components.
//!
//! Components own only view state (cursors, scroll offsets, suggestion
//! lists); the staged input and the response state live in the core types
//! and are passed in read-only at render time.

pub mod dropzone;
pub mod help;
pub mod response_panel;
pub mod status_bar;
pub mod text_entry;

use ratatui::layout::Rect;
use ratatui::Frame;

use triage_core::input::InputManager;
use triage_core::response::ResponseState;

use crate::action::Action;

/// Read-only snapshot of the domain state, rebuilt every frame.
pub struct ViewContext<'a> {
    pub input: &'a InputManager,
    pub response: &'a ResponseState,
    /// Blocking notice, if one is active.
    pub notice: Option<&'a str>,
}

/// Trait implemented by all TUI components.
pub trait Component {
    /// Handle an action and optionally return a new action to dispatch.
    fn handle_action(&mut self, action: &Action) -> Option<Action> {
        let _ = action;
        None
    }

    /// Render the component into the given area.
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &ViewContext);
}
