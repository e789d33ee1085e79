use super::{ConfirmationFlavor, Preview, or_default};
use crate::tui::layout::AuxiliaryMode;
use crate::tui::widgets::confirmation_prompt::ConfirmationPrompt;
use confab_domain::{ConfirmationRequest, ContentType};

pub const DEFAULT_TITLE: &str = "Confirm Action";
pub const DEFAULT_CONFIRM: &str = "Confirm";
pub const DEFAULT_CANCEL: &str = "Cancel";

/// A question put to the user, optionally with a content preview.
pub struct UserFlavor;

impl ConfirmationFlavor for UserFlavor {
    fn prompt(&self, request: &ConfirmationRequest) -> ConfirmationPrompt {
        ConfirmationPrompt {
            execution_id: request.execution_id.clone(),
            kind: request.kind,
            title: or_default(&request.title, DEFAULT_TITLE),
            message: request.message.clone(),
            confirm_text: or_default(&request.confirm_text, DEFAULT_CONFIRM),
            cancel_text: or_default(&request.cancel_text, DEFAULT_CANCEL),
        }
    }

    fn preview(&self, request: &ConfirmationRequest) -> Option<Preview> {
        if !request.has_content() {
            return None;
        }

        let title = or_default(&request.title, DEFAULT_TITLE);
        let file = request.file_path.as_deref().unwrap_or(&title);
        let (mode, title) = match request.content_type {
            ContentType::Diff => (AuxiliaryMode::DiffViewer, format!("Diff: {}", file)),
            ContentType::Markdown => (AuxiliaryMode::TextViewer, format!("Markdown: {}", file)),
            ContentType::Text | ContentType::None => (AuxiliaryMode::TextViewer, file.to_string()),
        };
        Some(Preview {
            mode,
            title,
            content_type: request.content_type,
            body: request.content.clone(),
        })
    }
}
