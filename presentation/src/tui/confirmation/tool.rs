use super::{ConfirmationFlavor, Preview, or_default};
use crate::tui::layout::AuxiliaryMode;
use crate::tui::widgets::confirmation_prompt::ConfirmationPrompt;
use confab_domain::{ConfirmationRequest, ContentType};

/// Approval for a tool the backend wants to run.
pub struct ToolFlavor;

impl ConfirmationFlavor for ToolFlavor {
    fn prompt(&self, request: &ConfirmationRequest) -> ConfirmationPrompt {
        let default_title = format!("Tool: {}", request.subject());
        ConfirmationPrompt {
            execution_id: request.execution_id.clone(),
            kind: request.kind,
            title: or_default(&request.title, &default_title),
            message: request.message.clone(),
            confirm_text: or_default(&request.confirm_text, "Yes"),
            cancel_text: or_default(&request.cancel_text, "No"),
        }
    }

    /// Tool arguments are shown as text, or in the diff viewer when the tool
    /// sent a patch.
    fn preview(&self, request: &ConfirmationRequest) -> Option<Preview> {
        if !request.has_content() {
            return None;
        }
        let mode = match request.content_type {
            ContentType::Diff => AuxiliaryMode::DiffViewer,
            _ => AuxiliaryMode::TextViewer,
        };
        Some(Preview {
            mode,
            title: format!("Tool: {}", request.subject()),
            content_type: request.content_type,
            body: request.content.clone(),
        })
    }
}
