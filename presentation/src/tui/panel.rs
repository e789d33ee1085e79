//! Panels: named screen regions with a swappable content renderer.

use super::content::PanelContent;
use ratatui::layout::{Position, Rect};
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

/// Stable panel identity.
///
/// The string forms are the view names shown in logs and the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Status,
    Conversation,
    Input,
    Debug,
    TextViewer,
    DiffViewer,
    /// Reserved slot left of the conversation; unregistered by default
    Left,
    /// Short-lived dialog views that are not part of the layout tree
    Ephemeral(String),
}

impl PanelId {
    pub fn as_str(&self) -> &str {
        match self {
            PanelId::Status => "status",
            PanelId::Conversation => "messages",
            PanelId::Input => "input",
            PanelId::Debug => "debug",
            PanelId::TextViewer => "text-viewer",
            PanelId::DiffViewer => "diff-viewer",
            PanelId::Left => "left",
            PanelId::Ephemeral(name) => name,
        }
    }

    /// Whether this panel shares the auxiliary slot.
    pub fn is_auxiliary(&self) -> bool {
        matches!(self, PanelId::Debug | PanelId::TextViewer | PanelId::DiffViewer)
    }
}

impl FromStr for PanelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(PanelId::Status),
            "messages" | "conversation" => Ok(PanelId::Conversation),
            "input" => Ok(PanelId::Input),
            "debug" => Ok(PanelId::Debug),
            "text-viewer" => Ok(PanelId::TextViewer),
            "diff-viewer" => Ok(PanelId::DiffViewer),
            "left" => Ok(PanelId::Left),
            "" => Err("Panel name cannot be empty".to_string()),
            other => Ok(PanelId::Ephemeral(other.to_string())),
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The realised screen region of a visible panel.
///
/// Created by the layout pass, deleted when the panel is hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub area: Rect,
    pub frame_color: Color,
    pub highlight: bool,
    pub editable: bool,
    /// Cursor relative to `area`, shown only while editable
    pub cursor: Option<Position>,
}

impl View {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            frame_color: Color::Reset,
            highlight: false,
            editable: false,
            cursor: None,
        }
    }
}

/// One registered panel.
#[derive(Debug)]
pub struct Panel {
    pub id: PanelId,
    pub content: PanelContent,
    pub(crate) visible: bool,
    /// Overrides the theme's border colour while set
    pub(crate) frame_color: Option<Color>,
    pub(crate) view: Option<View>,
}

impl Panel {
    pub fn new(id: PanelId, content: PanelContent) -> Self {
        Self {
            id,
            content,
            visible: true,
            frame_color: None,
            view: None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }
}
