//! Status bar widget: activity spinner, confirmation queue, focus indicator

use crate::tui::confirmation::QueueStatus;
use crate::tui::content::{Displayable, RenderContext, RenderError, ensure_area};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Width of the right-hand focus section
pub const FOCUS_SECTION_WIDTH: u16 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Streaming,
    AwaitingConfirmation,
}

impl Activity {
    fn label(&self) -> &'static str {
        match self {
            Activity::Idle => "ready",
            Activity::Streaming => "streaming",
            Activity::AwaitingConfirmation => "waiting for confirmation",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub activity: Activity,
    pub queue: QueueStatus,
    /// Name of the focused panel
    pub focus: String,
    pub zoomed: bool,
    /// Name of the visible auxiliary panel, if any
    pub auxiliary: Option<String>,
    spinner: usize,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spinner; it only moves while something is in progress.
    pub fn tick(&mut self) {
        if self.activity != Activity::Idle {
            self.spinner = (self.spinner + 1) % SPINNER.len();
        }
    }

    fn activity_text(&self) -> String {
        match self.activity {
            Activity::Idle => format!(" ● {}", self.activity.label()),
            _ => format!(" {} {}", SPINNER[self.spinner], self.activity.label()),
        }
    }

    fn queue_text(&self) -> String {
        match (self.queue.processing, self.queue.queued) {
            (false, _) => self
                .auxiliary
                .as_ref()
                .map(|aux| format!("viewer: {}", aux))
                .unwrap_or_default(),
            (true, 0) => "confirm: 1 active".to_string(),
            (true, n) => format!("confirm: 1 active, {} queued", n),
        }
    }

    fn focus_text(&self) -> String {
        let mut text = format!("focus: {}", self.focus);
        if self.zoomed {
            text.push_str(" │ zoom");
        }
        text.push_str(" │ F1 help ");
        text
    }
}

impl Displayable for StatusLine {
    fn title(&self) -> String {
        "Status".to_string()
    }

    fn render(
        &self,
        area: Rect,
        buf: &mut Buffer,
        ctx: &RenderContext<'_>,
    ) -> Result<(), RenderError> {
        ensure_area(area, 1, 1)?;

        let bg_style = Style::default().bg(ctx.theme.status_bg).fg(ctx.theme.status_fg);
        buf.set_style(area, bg_style);

        let sections = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Length(FOCUS_SECTION_WIDTH),
            ])
            .split(area);

        let activity_style = match self.activity {
            Activity::AwaitingConfirmation => bg_style
                .fg(ctx.theme.secondary)
                .add_modifier(Modifier::BOLD),
            _ => bg_style,
        };
        Paragraph::new(Line::from(Span::styled(self.activity_text(), activity_style)))
            .render(sections[0], buf);
        Paragraph::new(Line::from(Span::styled(self.queue_text(), bg_style)))
            .render(sections[1], buf);
        Paragraph::new(Line::from(Span::styled(self.focus_text(), bg_style)).right_aligned())
            .render(sections[2], buf);
        Ok(())
    }

    fn desired_height(&self, _width: u16) -> u16 {
        1
    }
}
