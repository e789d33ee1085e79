//! Panel content: the `Displayable` capability and its tagged variants.
//!
//! Every panel holds exactly one [`PanelContent`]. The variant can be swapped
//! at runtime (the input line becomes a confirmation prompt and back) while
//! the panel keeps its identity and screen region.

use super::theme::Theme;
use super::panel::View;
use super::widgets::{
    confirmation_prompt::ConfirmationPrompt, conversation::ConversationView, debug::DebugLog,
    diff_viewer::DiffViewer, input::InputLine, status_bar::StatusLine, text_viewer::TextViewer,
};
use ratatui::{buffer::Buffer, layout::Position, layout::Rect};
use thiserror::Error;

/// A renderer could not draw into its region.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("area {width}x{height} is smaller than the required {min_width}x{min_height}")]
    AreaTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

/// Fail unless `area` is at least `min_width` x `min_height`.
pub fn ensure_area(area: Rect, min_width: u16, min_height: u16) -> Result<(), RenderError> {
    if area.width < min_width || area.height < min_height {
        return Err(RenderError::AreaTooSmall {
            width: area.width,
            height: area.height,
            min_width,
            min_height,
        });
    }
    Ok(())
}

/// Everything a renderer may read besides its own state.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub view: &'a View,
}

impl RenderContext<'_> {
    pub fn focused(&self) -> bool {
        self.view.highlight
    }
}

/// Scroll requests routed to the focused (or hovered) panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up(u16),
    Down(u16),
    Top,
    Bottom,
}

/// Capability shared by every panel renderer.
pub trait Displayable {
    fn title(&self) -> String;

    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &RenderContext<'_>)
    -> Result<(), RenderError>;

    /// Rows needed to show everything at `width`, borders included.
    fn desired_height(&self, width: u16) -> u16;

    fn on_focus(&mut self) {}

    fn on_focus_lost(&mut self) {}

    /// Recompute wrapping for a new panel width.
    fn rewrap(&mut self, _width: u16) {}

    fn scroll(&mut self, _scroll: Scroll) {}

    /// Cursor position relative to the panel's region.
    fn cursor(&self) -> Option<Position> {
        None
    }
}

/// Tagged panel content.
#[derive(Debug)]
pub enum PanelContent {
    Conversation(ConversationView),
    Input(InputLine),
    Status(StatusLine),
    DiffViewer(DiffViewer),
    TextViewer(TextViewer),
    Debug(DebugLog),
    Prompt(ConfirmationPrompt),
}

impl PanelContent {
    pub fn kind(&self) -> &'static str {
        match self {
            PanelContent::Conversation(_) => "conversation",
            PanelContent::Input(_) => "input",
            PanelContent::Status(_) => "status",
            PanelContent::DiffViewer(_) => "diff-viewer",
            PanelContent::TextViewer(_) => "text-viewer",
            PanelContent::Debug(_) => "debug",
            PanelContent::Prompt(_) => "confirmation-prompt",
        }
    }

    fn as_displayable(&self) -> &dyn Displayable {
        match self {
            PanelContent::Conversation(c) => c,
            PanelContent::Input(c) => c,
            PanelContent::Status(c) => c,
            PanelContent::DiffViewer(c) => c,
            PanelContent::TextViewer(c) => c,
            PanelContent::Debug(c) => c,
            PanelContent::Prompt(c) => c,
        }
    }

    fn as_displayable_mut(&mut self) -> &mut dyn Displayable {
        match self {
            PanelContent::Conversation(c) => c,
            PanelContent::Input(c) => c,
            PanelContent::Status(c) => c,
            PanelContent::DiffViewer(c) => c,
            PanelContent::TextViewer(c) => c,
            PanelContent::Debug(c) => c,
            PanelContent::Prompt(c) => c,
        }
    }

    pub fn as_prompt(&self) -> Option<&ConfirmationPrompt> {
        match self {
            PanelContent::Prompt(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_conversation_mut(&mut self) -> Option<&mut ConversationView> {
        match self {
            PanelContent::Conversation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_input_mut(&mut self) -> Option<&mut InputLine> {
        match self {
            PanelContent::Input(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_status_mut(&mut self) -> Option<&mut StatusLine> {
        match self {
            PanelContent::Status(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_diff_viewer_mut(&mut self) -> Option<&mut DiffViewer> {
        match self {
            PanelContent::DiffViewer(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_text_viewer_mut(&mut self) -> Option<&mut TextViewer> {
        match self {
            PanelContent::TextViewer(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_debug_mut(&mut self) -> Option<&mut DebugLog> {
        match self {
            PanelContent::Debug(c) => Some(c),
            _ => None,
        }
    }
}

impl Displayable for PanelContent {
    fn title(&self) -> String {
        self.as_displayable().title()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        self.as_displayable().render(area, buf, ctx)
    }

    fn desired_height(&self, width: u16) -> u16 {
        self.as_displayable().desired_height(width)
    }

    fn on_focus(&mut self) {
        self.as_displayable_mut().on_focus()
    }

    fn on_focus_lost(&mut self) {
        self.as_displayable_mut().on_focus_lost()
    }

    fn rewrap(&mut self, width: u16) {
        self.as_displayable_mut().rewrap(width)
    }

    fn scroll(&mut self, scroll: Scroll) {
        self.as_displayable_mut().scroll(scroll)
    }

    fn cursor(&self) -> Option<Position> {
        self.as_displayable().cursor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_area() {
        assert!(ensure_area(Rect::new(0, 0, 10, 3), 3, 3).is_ok());
        assert_eq!(
            ensure_area(Rect::new(0, 0, 10, 2), 3, 3),
            Err(RenderError::AreaTooSmall {
                width: 10,
                height: 2,
                min_width: 3,
                min_height: 3,
            })
        );
    }

    #[test]
    fn test_typed_access_matches_variant() {
        let mut content = PanelContent::Input(InputLine::default());
        assert_eq!(content.kind(), "input");
        assert!(content.as_input_mut().is_some());
        assert!(content.as_conversation_mut().is_none());
        assert!(content.as_prompt().is_none());
    }
}
