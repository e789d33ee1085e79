//! Diff viewer: unified diff preview in the auxiliary slot

use super::{ScrollState, panel_block, wrapped_lines};
use crate::tui::content::{Displayable, RenderContext, RenderError, Scroll, ensure_area};
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Widget, Wrap},
};

#[derive(Debug, Default, Clone)]
pub struct DiffViewer {
    title: String,
    content: String,
    scroll: ScrollState,
    width: u16,
}

impl DiffViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown diff and scroll back to the top.
    pub fn load(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.scroll.offset = 0;
        self.recount();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    #[cfg(test)]
    pub(crate) fn wrap_width(&self) -> u16 {
        self.width
    }

    fn recount(&mut self) {
        self.scroll.lines = wrapped_lines(
            self.styled(&Theme::default()),
            self.width.saturating_sub(2),
        );
    }

    fn styled(&self, theme: &Theme) -> Text<'_> {
        let lines: Vec<Line> = self
            .content
            .lines()
            .map(|line| {
                let style = if line.starts_with("+++") || line.starts_with("---") {
                    Style::default().fg(theme.muted).add_modifier(Modifier::BOLD)
                } else if line.starts_with('+') {
                    Style::default().fg(theme.diff_added)
                } else if line.starts_with('-') {
                    Style::default().fg(theme.diff_removed)
                } else if line.starts_with("@@") {
                    Style::default().fg(theme.diff_hunk)
                } else {
                    Style::default().fg(theme.text)
                };
                Line::styled(line, style)
            })
            .collect();
        Text::from(lines)
    }
}

impl Displayable for DiffViewer {
    fn title(&self) -> String {
        if self.title.is_empty() {
            "Diff".to_string()
        } else {
            self.title.clone()
        }
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, 3, 3)?;
        let height = area.height.saturating_sub(2);
        Paragraph::new(self.styled(ctx.theme))
            .wrap(Wrap { trim: false })
            .block(panel_block(&self.title(), ctx))
            .scroll((self.scroll.visible_offset(height), 0))
            .render(area, buf);
        Ok(())
    }

    fn desired_height(&self, width: u16) -> u16 {
        wrapped_lines(self.styled(&Theme::default()), width.saturating_sub(2)).saturating_add(2)
    }

    fn rewrap(&mut self, width: u16) {
        self.width = width;
        self.recount();
    }

    fn scroll(&mut self, scroll: Scroll) {
        self.scroll.apply(scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resets_scroll_and_title() {
        let mut viewer = DiffViewer::new();
        viewer.rewrap(40);
        viewer.load("Diff: a.rs", "+a\n".repeat(50));
        viewer.scroll(Scroll::Down(10));

        viewer.load("Diff: b.rs", "-b\n");
        assert_eq!(viewer.title(), "Diff: b.rs");
        assert_eq!(viewer.scroll.offset, 0);
        assert_eq!(viewer.content(), "-b\n");
    }

    #[test]
    fn test_line_styles_follow_prefix() {
        let mut viewer = DiffViewer::new();
        viewer.load("", "--- a\n+++ b\n@@ -1 +1 @@\n-old\n+new\n same");
        let theme = Theme::default();
        let text = viewer.styled(&theme);
        assert_eq!(text.lines[2].style.fg, Some(theme.diff_hunk));
        assert_eq!(text.lines[3].style.fg, Some(theme.diff_removed));
        assert_eq!(text.lines[4].style.fg, Some(theme.diff_added));
        assert_eq!(text.lines[5].style.fg, Some(theme.text));
        assert_eq!(viewer.title(), "Diff");
    }
}
