//! TUI (Text User Interface) module for confab
//!
//! Panels are laid out by [`LayoutEngine`]; yes/no requests from the backend
//! are serialised onto the input panel by [`ConfirmationCoordinator`].
//! [`TuiApp`] owns both and runs the terminal loop.

mod app;
mod chat;
pub mod clipboard;
mod commands;
pub mod confirmation;
pub mod content;
mod event;
pub mod focus;
mod keymap;
pub mod layout;
pub mod panel;
pub mod theme;
pub mod widgets;

pub use app::{TuiApp, TuiSettings};
pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use confirmation::{ConfirmationCoordinator, KeyOutcome, QueueStatus, Submission};
pub use content::{Displayable, PanelContent, RenderError, Scroll};
pub use event::AppEvent;
pub use layout::{AuxiliaryMode, LayoutConfig, LayoutEngine, LayoutError, RightPanelState};
pub use panel::PanelId;
pub use theme::{Theme, ThemeName};
