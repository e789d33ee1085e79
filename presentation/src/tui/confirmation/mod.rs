//! Confirmation workflow: serialises yes/no requests onto the input panel.
//!
//! Requests come in two flavours sharing one coordinator: `tool` approvals
//! from backend safety gates and `user` questions that may carry a diff or
//! markdown preview. Only one prompt occupies the input panel at a time;
//! the rest wait in a FIFO queue.

mod coordinator;
mod keys;
mod queue;
mod seen;
mod tool;
mod user;

pub use coordinator::{ConfirmationCoordinator, Submission};
pub use keys::{Decision, interpret_key};
pub use queue::ConfirmationQueue;
pub use seen::{SEEN_CAPACITY, SeenIds};
pub use tool::ToolFlavor;
pub use user::UserFlavor;

use super::layout::AuxiliaryMode;
use super::widgets::confirmation_prompt::ConfirmationPrompt;
use confab_domain::{ConfirmationKind, ConfirmationRequest, ContentType};

/// Whether a key event was consumed by the active prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    NotHandled,
}

/// Snapshot for the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStatus {
    /// A prompt currently occupies the input panel
    pub processing: bool,
    pub queued: usize,
}

/// Content to load into an auxiliary viewer while a prompt is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub mode: AuxiliaryMode,
    pub title: String,
    pub content_type: ContentType,
    pub body: String,
}

/// Per-kind presentation of a request.
pub trait ConfirmationFlavor: Sync {
    /// Build the prompt, filling in default texts.
    fn prompt(&self, request: &ConfirmationRequest) -> ConfirmationPrompt;

    /// The viewer content to open alongside the prompt, if any.
    fn preview(&self, request: &ConfirmationRequest) -> Option<Preview>;
}

pub fn flavor_for(kind: ConfirmationKind) -> &'static dyn ConfirmationFlavor {
    match kind {
        ConfirmationKind::Tool => &ToolFlavor,
        ConfirmationKind::User => &UserFlavor,
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
