//! Conversation widget: message history + streaming text

use super::{TailScroll, panel_block, wrapped_lines};
use crate::tui::content::{Displayable, RenderContext, RenderError, Scroll, ensure_area};
use crate::tui::theme::Theme;
use confab_domain::{ChatMessage, MessageRole};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget, Wrap},
};

/// Conversation state owned by the `messages` panel.
#[derive(Debug, Default)]
pub struct ConversationView {
    messages: Vec<ChatMessage>,
    streaming: Option<String>,
    scroll: TailScroll,
    wrap_width: u16,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[cfg(test)]
    pub(crate) fn wrap_width(&self) -> u16 {
        self.wrap_width
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming.is_some()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.recount();
    }

    pub fn append_stream(&mut self, chunk: &str) {
        self.streaming.get_or_insert_with(String::new).push_str(chunk);
        self.recount();
    }

    /// Move the streamed text into the history as an assistant message.
    pub fn finish_stream(&mut self) {
        if let Some(text) = self.streaming.take() {
            if !text.is_empty() {
                self.messages.push(ChatMessage::assistant(text));
            }
        }
        self.recount();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.streaming = None;
        self.scroll = TailScroll::default();
        self.recount();
    }

    /// Lines scrolled up from the bottom.
    pub fn scroll_offset(&self) -> u16 {
        self.scroll.from_bottom
    }

    fn recount(&mut self) {
        self.scroll.lines = wrapped_lines(self.build_text(&Theme::default()), self.content_width());
    }

    fn content_width(&self) -> u16 {
        self.wrap_width.saturating_sub(2)
    }

    fn build_text(&self, theme: &Theme) -> Text<'_> {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &self.messages {
            let role_style = Style::default()
                .fg(theme.role_color(msg.role))
                .add_modifier(Modifier::BOLD);

            let mut header = vec![Span::styled(format!("{}: ", msg.role.label()), role_style)];
            if msg.role == MessageRole::User {
                header.push(Span::styled(
                    msg.timestamp.format("%H:%M").to_string(),
                    Style::default().fg(theme.muted),
                ));
            }
            lines.push(Line::from(header));

            for content_line in msg.content.lines() {
                lines.push(Line::from(format!("  {}", content_line)));
            }
            lines.push(Line::from(""));
        }

        if let Some(streaming) = &self.streaming {
            lines.push(Line::from(Span::styled(
                format!("{}: ", MessageRole::Assistant.label()),
                Style::default()
                    .fg(theme.role_color(MessageRole::Assistant))
                    .add_modifier(Modifier::BOLD),
            )));
            for content_line in streaming.lines() {
                lines.push(Line::from(format!("  {}", content_line)));
            }
            lines.push(Line::from(Span::styled(
                "  ▌",
                Style::default().fg(theme.role_color(MessageRole::Assistant)),
            )));
        }

        Text::from(lines)
    }
}

impl Displayable for ConversationView {
    fn title(&self) -> String {
        "Conversation".to_string()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, 3, 3)?;
        let visible_height = area.height.saturating_sub(2); // borders
        let content_width = area.width.saturating_sub(2);

        // Count without the block so only content lines are measured
        let paragraph = Paragraph::new(self.build_text(ctx.theme)).wrap(Wrap { trim: false });
        let total = u16::try_from(paragraph.line_count(content_width)).unwrap_or(u16::MAX);
        let scroll = TailScroll {
            from_bottom: self.scroll.from_bottom,
            lines: total,
        };

        paragraph
            .block(panel_block(&self.title(), ctx))
            .style(Style::default().fg(ctx.theme.text))
            .scroll((scroll.top_row(visible_height), 0))
            .render(area, buf);
        Ok(())
    }

    fn desired_height(&self, width: u16) -> u16 {
        wrapped_lines(self.build_text(&Theme::default()), width.saturating_sub(2)).saturating_add(2)
    }

    fn rewrap(&mut self, width: u16) {
        self.wrap_width = width;
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
    fn test_stream_becomes_assistant_message() {
        let mut view = ConversationView::new();
        view.push(ChatMessage::user("hi"));
        view.append_stream("Hello ");
        view.append_stream("there");
        assert!(view.is_streaming());

        view.finish_stream();
        assert!(!view.is_streaming());
        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.messages()[1].role, MessageRole::Assistant);
        assert_eq!(view.messages()[1].content, "Hello there");
    }

    #[test]
    fn test_narrower_width_wraps_to_more_lines() {
        let mut view = ConversationView::new();
        view.push(ChatMessage::assistant("word ".repeat(40)));

        view.rewrap(80);
        let wide = view.desired_height(80);
        view.rewrap(30);
        let narrow = view.desired_height(30);
        assert!(narrow > wide);
    }

    #[test]
    fn test_scroll_up_then_bottom() {
        let mut view = ConversationView::new();
        view.rewrap(40);
        for i in 0..30 {
            view.push(ChatMessage::system(format!("line {}", i)));
        }
        view.scroll(Scroll::Up(5));
        assert_eq!(view.scroll_offset(), 5);
        view.scroll(Scroll::Bottom);
        assert_eq!(view.scroll_offset(), 0);
    }
}
