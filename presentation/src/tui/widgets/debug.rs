//! Debug panel: bounded log of diagnostics and bus traffic

use super::{TailScroll, panel_block, wrapped_lines};
use crate::tui::content::{Displayable, RenderContext, RenderError, Scroll, ensure_area};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Paragraph, Widget, Wrap},
};
use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 500;

#[derive(Debug, Clone)]
pub struct DebugLog {
    lines: VecDeque<String>,
    capacity: usize,
    scroll: TailScroll,
    width: u16,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DebugLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            scroll: TailScroll::default(),
            width: 0,
        }
    }

    /// Append a line, dropping the oldest once full.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
        self.recount();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn text(&self) -> Text<'_> {
        Text::from(
            self.lines
                .iter()
                .map(|l| Line::from(l.as_str()))
                .collect::<Vec<_>>(),
        )
    }

    fn recount(&mut self) {
        self.scroll.lines = wrapped_lines(self.text(), self.width.saturating_sub(2));
    }
}

impl Displayable for DebugLog {
    fn title(&self) -> String {
        "Debug".to_string()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, 3, 3)?;
        let height = area.height.saturating_sub(2);
        let paragraph = Paragraph::new(self.text()).wrap(Wrap { trim: false });
        let total = u16::try_from(paragraph.line_count(area.width.saturating_sub(2)))
            .unwrap_or(u16::MAX);
        let scroll = TailScroll {
            from_bottom: self.scroll.from_bottom,
            lines: total,
        };
        paragraph
            .block(panel_block(&self.title(), ctx))
            .style(Style::default().fg(ctx.theme.muted))
            .scroll((scroll.top_row(height), 0))
            .render(area, buf);
        Ok(())
    }

    fn desired_height(&self, width: u16) -> u16 {
        wrapped_lines(self.text(), width.saturating_sub(2)).saturating_add(2)
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
    fn test_capacity_drops_oldest() {
        let mut log = DebugLog::with_capacity(3);
        for i in 0..5 {
            log.push(format!("event {}", i));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(
            log.lines().collect::<Vec<_>>(),
            vec!["event 2", "event 3", "event 4"]
        );
    }

    #[test]
    fn test_empty_log() {
        let log = DebugLog::new();
        assert!(log.is_empty());
        assert_eq!(log.title(), "Debug");
    }
}
