//! Text viewer: markdown / plain text preview, also used for help

use super::{ScrollState, panel_block, wrapped_lines};
use crate::tui::content::{Displayable, RenderContext, RenderError, Scroll, ensure_area};
use crate::tui::theme::Theme;
use confab_domain::ContentType;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Widget, Wrap},
};

#[derive(Debug, Default, Clone)]
pub struct TextViewer {
    title: String,
    content_type: ContentType,
    content: String,
    scroll: ScrollState,
    width: u16,
}

impl TextViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(
        title: impl Into<String>,
        content_type: ContentType,
        content: impl Into<String>,
    ) -> Self {
        let mut viewer = Self::new();
        viewer.load(title, content_type, content);
        viewer
    }

    pub fn load(
        &mut self,
        title: impl Into<String>,
        content_type: ContentType,
        content: impl Into<String>,
    ) {
        self.title = title.into();
        self.content_type = content_type;
        self.content = content.into();
        self.scroll.offset = 0;
        self.recount();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn recount(&mut self) {
        self.scroll.lines = wrapped_lines(
            self.styled(&Theme::default()),
            self.width.saturating_sub(2),
        );
    }

    fn styled(&self, theme: &Theme) -> Text<'_> {
        if self.content_type != ContentType::Markdown {
            return Text::styled(self.content.as_str(), Style::default().fg(theme.text));
        }

        let mut in_code = false;
        let lines: Vec<Line> = self
            .content
            .lines()
            .map(|line| {
                let trimmed = line.trim_start();
                if trimmed.starts_with("```") {
                    in_code = !in_code;
                    return Line::styled(line, Style::default().fg(theme.muted));
                }
                let style = if in_code {
                    Style::default().fg(theme.accent)
                } else if trimmed.starts_with('#') {
                    Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
                } else if trimmed.starts_with('>') {
                    Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC)
                } else {
                    Style::default().fg(theme.text)
                };
                Line::styled(line, style)
            })
            .collect();
        Text::from(lines)
    }
}

impl Displayable for TextViewer {
    fn title(&self) -> String {
        if self.title.is_empty() {
            "Text".to_string()
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
    fn test_markdown_heading_and_code_styles() {
        let viewer = TextViewer::with_text(
            "Markdown: README.md",
            ContentType::Markdown,
            "# Title\nbody\n```\nlet x = 1;\n```",
        );
        let theme = Theme::default();
        let text = viewer.styled(&theme);
        assert_eq!(text.lines[0].style.fg, Some(theme.primary));
        assert_eq!(text.lines[1].style.fg, Some(theme.text));
        assert_eq!(text.lines[3].style.fg, Some(theme.accent));
    }

    #[test]
    fn test_plain_text_is_not_styled_as_markdown() {
        let viewer = TextViewer::with_text("", ContentType::Text, "# not a heading");
        let theme = Theme::default();
        let text = viewer.styled(&theme);
        assert_eq!(text.lines.len(), 1);
        assert_eq!(viewer.title(), "Text");
        assert_eq!(viewer.content_type(), ContentType::Text);
    }
}
