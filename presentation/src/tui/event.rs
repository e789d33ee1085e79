//! Events posted back onto the UI loop
//!
//! Bus handlers run on worker tasks; they never touch layout or
//! confirmation state themselves but send one of these through the loop's
//! inbox instead.

use confab_application::{BackendEvent, CommandEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Delivered from the backend bus
    Backend(BackendEvent),
    /// Delivered from the command bus
    Command(CommandEvent),
    /// A line for the debug panel
    Diagnostic(String),
    /// A chat exchange task finished (by generation)
    ChatFinished(u64),
}
