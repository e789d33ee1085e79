//! Confirmation prompt: takes over the input panel while a request is active

use super::{panel_block, wrapped_lines};
use crate::tui::content::{Displayable, RenderContext, RenderError, ensure_area};
use crate::tui::theme::Theme;
use confab_domain::{ConfirmationKind, ExecutionId};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Message rows the prompt may grow to before it is clipped.
const MAX_TEXT_ROWS: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub execution_id: ExecutionId,
    pub kind: ConfirmationKind,
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmationPrompt {
    /// The keyboard choices, e.g. `1 - Yes | 2 - No`.
    pub fn options(&self) -> String {
        format!("1 - {} | 2 - {}", self.confirm_text, self.cancel_text)
    }

    fn line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled(
            self.options(),
            Style::default()
                .fg(theme.secondary)
                .add_modifier(Modifier::BOLD),
        )];
        if !self.message.is_empty() {
            spans.push(Span::styled(
                format!("  {}", self.message),
                Style::default().fg(theme.text),
            ));
        }
        Line::from(spans)
    }
}

impl Displayable for ConfirmationPrompt {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, 3, 3)?;

        Paragraph::new(self.line(ctx.theme))
            .block(panel_block(&self.title(), ctx))
            .wrap(Wrap { trim: false })
            .render(area, buf);
        Ok(())
    }

    /// Borders plus the wrapped options and message, up to a few rows.
    fn desired_height(&self, width: u16) -> u16 {
        let rows = wrapped_lines(self.line(&Theme::default()).into(), width.saturating_sub(2));
        rows.clamp(1, MAX_TEXT_ROWS) + 2
    }
}
