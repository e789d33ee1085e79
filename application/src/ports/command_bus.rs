//! UI-internal command event bus port.
//!
//! Unlike the backend bus this one only carries signals between UI parts
//! (cancel the current input, theme switched, help requested).
//!
//! Delivery semantics implementations must honour:
//! - `emit` hands every current subscriber its own unit of work and returns
//!   without waiting for any of them;
//! - a subscriber registered with `subscribe_once` is removed by the first
//!   emission that invokes it;
//! - a failing subscriber never prevents delivery to the others.

use super::event_bus::SubscriptionId;
use confab_domain::ExecutionId;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandTopic {
    InputText,
    InputCancel,
    ThemeChanged,
    ShortcutHelp,
}

impl CommandTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandTopic::InputText => "user.input.text",
            CommandTopic::InputCancel => "user.input.cancel",
            CommandTopic::ThemeChanged => "theme.changed",
            CommandTopic::ShortcutHelp => "shortcut.help",
        }
    }
}

impl fmt::Display for CommandTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    /// Text submitted from the input line
    InputText(String),
    /// Abort whatever the user is currently waiting on.
    ///
    /// `confirmation` is the prompt that was on screen when the cancel was
    /// raised. Delivery is asynchronous, so receivers decline prompts only
    /// when the same one is still active.
    InputCancel { confirmation: Option<ExecutionId> },
    /// A new theme was selected, by name
    ThemeChanged(String),
    ShortcutHelp,
}

impl CommandEvent {
    pub fn topic(&self) -> CommandTopic {
        match self {
            CommandEvent::InputText(_) => CommandTopic::InputText,
            CommandEvent::InputCancel { .. } => CommandTopic::InputCancel,
            CommandEvent::ThemeChanged(_) => CommandTopic::ThemeChanged,
            CommandEvent::ShortcutHelp => CommandTopic::ShortcutHelp,
        }
    }
}

pub type CommandHandler = Arc<dyn Fn(CommandEvent) + Send + Sync>;

/// Port for the command event bus.
pub trait CommandBus: Send + Sync {
    fn subscribe(&self, topic: CommandTopic, handler: CommandHandler) -> SubscriptionId;

    fn subscribe_once(&self, topic: CommandTopic, handler: CommandHandler) -> SubscriptionId;

    fn unsubscribe(&self, topic: CommandTopic, id: SubscriptionId) -> bool;

    /// Dispatch to every current subscriber of the event's topic.
    ///
    /// Returns how many subscribers were handed the event.
    fn emit(&self, event: CommandEvent) -> usize;

    fn clear(&self);
}
