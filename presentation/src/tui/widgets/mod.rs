//! TUI widgets: one renderer per panel content kind
//!
//! Layout:
//! ┌── Left (unused) ─┬── Conversation (w2 / w1) ──┬── Auxiliary (w1 / w4) ─┐
//! ├── Input / Confirmation prompt (3) ────────────┴────────────────────────┤
//! └── Status (1): activity (w2) │ queue (w1) │ focus (36) ──────────────────┘

pub mod confirmation_prompt;
pub mod conversation;
pub mod debug;
pub mod diff_viewer;
pub mod input;
pub mod status_bar;
pub mod text_viewer;

use super::content::{RenderContext, Scroll};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Bordered block whose frame follows the view's colour and focus.
pub(crate) fn panel_block<'a>(title: &str, ctx: &RenderContext<'_>) -> Block<'a> {
    let mut title_style = Style::default().fg(ctx.view.frame_color);
    if ctx.focused() {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ctx.view.frame_color))
        .title(ratatui::text::Span::styled(format!(" {} ", title), title_style))
}

/// Rows `text` occupies when wrapped to `width` columns.
pub(crate) fn wrapped_lines(text: Text<'_>, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let count = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .line_count(width);
    u16::try_from(count).unwrap_or(u16::MAX)
}

/// Top-anchored scroll position for the viewers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: u16,
    pub lines: u16,
}

impl ScrollState {
    pub fn apply(&mut self, scroll: Scroll) {
        self.offset = match scroll {
            Scroll::Up(n) => self.offset.saturating_sub(n),
            Scroll::Down(n) => self.offset.saturating_add(n).min(self.lines),
            Scroll::Top => 0,
            Scroll::Bottom => self.lines,
        };
    }

    /// Offset clamped so the last page stays full.
    pub fn visible_offset(&self, height: u16) -> u16 {
        self.offset.min(self.lines.saturating_sub(height))
    }
}

/// Bottom-anchored scroll: 0 follows new output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TailScroll {
    pub from_bottom: u16,
    pub lines: u16,
}

impl TailScroll {
    pub fn apply(&mut self, scroll: Scroll) {
        self.from_bottom = match scroll {
            Scroll::Up(n) => self.from_bottom.saturating_add(n).min(self.lines),
            Scroll::Down(n) => self.from_bottom.saturating_sub(n),
            Scroll::Top => self.lines,
            Scroll::Bottom => 0,
        };
    }

    /// Paragraph scroll row for a viewport of `height` rows.
    pub fn top_row(&self, height: u16) -> u16 {
        let max_scroll = self.lines.saturating_sub(height);
        max_scroll - self.from_bottom.min(max_scroll)
    }
}

/// Centre a `percent_x` x `percent_y` rectangle inside `area`.
pub fn centered_overlay(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_scroll_follows_bottom() {
        let mut scroll = TailScroll {
            from_bottom: 0,
            lines: 50,
        };
        assert_eq!(scroll.top_row(10), 40);
        scroll.apply(Scroll::Up(5));
        assert_eq!(scroll.top_row(10), 35);
        scroll.apply(Scroll::Top);
        assert_eq!(scroll.top_row(10), 0);
        scroll.apply(Scroll::Bottom);
        assert_eq!(scroll.top_row(10), 40);
    }

    #[test]
    fn test_scroll_state_clamps_to_last_page() {
        let mut scroll = ScrollState {
            offset: 0,
            lines: 20,
        };
        scroll.apply(Scroll::Down(100));
        assert_eq!(scroll.offset, 20);
        assert_eq!(scroll.visible_offset(8), 12);
        scroll.apply(Scroll::Up(3));
        assert_eq!(scroll.visible_offset(8), 12);
    }

    #[test]
    fn test_centered_overlay_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let overlay = centered_overlay(60, 50, area);
        assert_eq!(overlay.width, 60);
        assert_eq!(overlay.height, 20);
        assert_eq!(overlay.x, 20);
        assert_eq!(overlay.y, 10);
    }
}
