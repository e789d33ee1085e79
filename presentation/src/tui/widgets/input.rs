//! Input widget: single-line editor for prompts and `:` commands
//!
//! Long input scrolls horizontally so the cursor always stays visible.
//! Submitted lines are kept in memory for Up/Down recall.

use super::panel_block;
use crate::tui::content::{Displayable, RenderContext, RenderError, ensure_area};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use std::collections::VecDeque;

pub const PROMPT: &str = "> ";

/// Submitted lines remembered for recall.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputLine {
    buffer: String,
    /// Cursor as a char index into `buffer`
    cursor: usize,
    width: u16,
    /// Oldest first, no duplicates
    history: VecDeque<String>,
    /// Steps back from the newest entry while recalling
    recall: Option<usize>,
    /// Line being typed before recall started
    draft: String,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.buffer.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Take the submitted text, leaving the line empty. Non-blank lines
    /// are remembered for recall.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.recall = None;
        self.draft.clear();
        let text = std::mem::take(&mut self.buffer);
        self.remember(text.trim());
        text
    }

    fn remember(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        self.history.retain(|entry| entry != line);
        self.history.push_back(line.to_string());
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Replace the line with the previous (older) history entry. Stops at
    /// the oldest one.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let step = match self.recall {
            None => {
                self.draft = self.buffer.clone();
                0
            }
            Some(step) => (step + 1).min(self.history.len() - 1),
        };
        self.show_recalled(step);
    }

    /// Move towards newer entries; past the newest the draft comes back.
    pub fn history_next(&mut self) {
        match self.recall {
            None => {}
            Some(0) => {
                self.recall = None;
                self.buffer = std::mem::take(&mut self.draft);
                self.cursor = self.char_len();
            }
            Some(step) => self.show_recalled(step - 1),
        }
    }

    fn show_recalled(&mut self, step: usize) {
        let index = self.history.len() - 1 - step;
        if let Some(entry) = self.history.get(index) {
            self.buffer = entry.clone();
            self.cursor = self.char_len();
            self.recall = Some(step);
        }
    }

    /// Columns available for text after borders and prompt.
    fn text_columns(&self) -> usize {
        (self.width.saturating_sub(2) as usize)
            .saturating_sub(PROMPT.len())
            .max(1)
    }

    /// First char shown so that the cursor cell is on screen.
    fn window_start(&self) -> usize {
        let columns = self.text_columns();
        (self.cursor + 1).saturating_sub(columns)
    }
}

impl Displayable for InputLine {
    fn title(&self) -> String {
        "Input".to_string()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, PROMPT.len() as u16 + 3, 3)?;

        let prompt_color = if ctx.view.editable {
            ctx.theme.primary
        } else {
            ctx.theme.muted
        };
        let visible: String = self
            .buffer
            .chars()
            .skip(self.window_start())
            .take(self.text_columns())
            .collect();

        let line = Line::from(vec![
            Span::styled(
                PROMPT,
                Style::default().fg(prompt_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(visible, Style::default().fg(ctx.theme.text)),
        ]);

        Paragraph::new(line)
            .block(panel_block(&self.title(), ctx))
            .render(area, buf);
        Ok(())
    }

    fn desired_height(&self, _width: u16) -> u16 {
        3
    }

    /// Focusing the input always starts editing at the beginning of the line.
    fn on_focus(&mut self) {
        self.cursor = 0;
    }

    fn rewrap(&mut self, width: u16) {
        self.width = width;
    }

    fn cursor(&self) -> Option<Position> {
        let column = 1 + PROMPT.len() + (self.cursor - self.window_start());
        Some(Position::new(u16::try_from(column).unwrap_or(u16::MAX), 1))
    }
}
