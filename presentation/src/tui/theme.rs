//! Theme: explicit colour context handed to the layout engine.
//!
//! There is no process-wide theme: the [`LayoutEngine`](super::layout::LayoutEngine)
//! owns the active [`Theme`] and passes it to every renderer through
//! [`RenderContext`](super::content::RenderContext).

use confab_domain::MessageRole;
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeName {
    #[default]
    Default,
    Light,
    HighContrast,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Default, ThemeName::Light, ThemeName::HighContrast];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Light => "light",
            ThemeName::HighContrast => "high-contrast",
        }
    }
}

impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "dark" => Ok(ThemeName::Default),
            "light" => Ok(ThemeName::Light),
            "high-contrast" | "high_contrast" | "contrast" => Ok(ThemeName::HighContrast),
            other => Err(format!(
                "Unknown theme: '{}'. Valid: default, light, high-contrast",
                other
            )),
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    pub primary: Color,
    /// Frame colour of an active confirmation prompt
    pub secondary: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub focus_border: Color,
    pub error: Color,
    pub status_fg: Color,
    pub status_bg: Color,
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_hunk: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self {
                name,
                primary: Color::Cyan,
                secondary: Color::Yellow,
                accent: Color::Magenta,
                text: Color::White,
                muted: Color::DarkGray,
                border: Color::Gray,
                focus_border: Color::Cyan,
                error: Color::Red,
                status_fg: Color::White,
                status_bg: Color::DarkGray,
                diff_added: Color::Green,
                diff_removed: Color::Red,
                diff_hunk: Color::Cyan,
            },
            ThemeName::Light => Self {
                name,
                primary: Color::Blue,
                secondary: Color::Rgb(176, 96, 0),
                accent: Color::Magenta,
                text: Color::Black,
                muted: Color::Gray,
                border: Color::DarkGray,
                focus_border: Color::Blue,
                error: Color::Red,
                status_fg: Color::Black,
                status_bg: Color::Gray,
                diff_added: Color::Rgb(0, 128, 0),
                diff_removed: Color::Rgb(176, 0, 0),
                diff_hunk: Color::Blue,
            },
            ThemeName::HighContrast => Self {
                name,
                primary: Color::White,
                secondary: Color::LightYellow,
                accent: Color::LightMagenta,
                text: Color::White,
                muted: Color::Gray,
                border: Color::White,
                focus_border: Color::LightCyan,
                error: Color::LightRed,
                status_fg: Color::Black,
                status_bg: Color::White,
                diff_added: Color::LightGreen,
                diff_removed: Color::LightRed,
                diff_hunk: Color::LightCyan,
            },
        }
    }

    pub fn role_color(&self, role: MessageRole) -> Color {
        match role {
            MessageRole::User => self.primary,
            MessageRole::Assistant => self.diff_added,
            MessageRole::System => self.muted,
            MessageRole::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(ThemeName::Default)
    }
}
