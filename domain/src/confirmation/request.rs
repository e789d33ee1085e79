//! Confirmation request and response entities

use super::content_type::ContentType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque correlation token chosen by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExecutionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ExecutionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which backend gate produced the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationKind {
    /// A tool call waiting on a safety gate
    Tool,
    /// A free-form decision, usually with a content preview
    User,
}

impl ConfirmationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationKind::Tool => "tool",
            ConfirmationKind::User => "user",
        }
    }
}

impl fmt::Display for ConfirmationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A yes/no question from the backend.
///
/// Empty strings mean "not provided"; the UI substitutes defaults for the
/// title and button labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub execution_id: ExecutionId,
    pub kind: ConfirmationKind,
    /// Auto-accept lookup key: the tool name for tool requests, the title
    /// for user requests.
    pub subject: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub confirm_text: String,
    #[serde(default)]
    pub cancel_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ConfirmationRequest {
    /// Request approval for running `tool_name`.
    pub fn tool(execution_id: impl Into<ExecutionId>, tool_name: impl Into<String>) -> Self {
        Self::bare(execution_id.into(), ConfirmationKind::Tool, tool_name.into())
    }

    /// Ask the user a titled question.
    pub fn user(execution_id: impl Into<ExecutionId>, title: impl Into<String>) -> Self {
        let title = title.into();
        let mut request = Self::bare(execution_id.into(), ConfirmationKind::User, title.clone());
        request.title = title;
        request
    }

    fn bare(execution_id: ExecutionId, kind: ConfirmationKind, subject: String) -> Self {
        Self {
            execution_id,
            kind,
            subject,
            title: String::new(),
            message: String::new(),
            content: String::new(),
            content_type: ContentType::None,
            confirm_text: String::new(),
            cancel_text: String::new(),
            file_path: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_content(mut self, content_type: ContentType, content: impl Into<String>) -> Self {
        self.content_type = content_type;
        self.content = content.into();
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_buttons(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_text = confirm.into();
        self.cancel_text = cancel.into();
        self
    }

    /// The key used for auto-accept lookups.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// The user's answer, correlated only by execution id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationResponse {
    pub execution_id: ExecutionId,
    pub confirmed: bool,
}

impl ConfirmationResponse {
    pub fn accept(execution_id: ExecutionId) -> Self {
        Self {
            execution_id,
            confirmed: true,
        }
    }

    pub fn decline(execution_id: ExecutionId) -> Self {
        Self {
            execution_id,
            confirmed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_subject_is_tool_name() {
        let req = ConfirmationRequest::tool("exec-1", "run_command");
        assert_eq!(req.subject(), "run_command");
        assert_eq!(req.kind, ConfirmationKind::Tool);
        assert!(req.title.is_empty());
    }

    #[test]
    fn test_user_subject_is_title() {
        let req = ConfirmationRequest::user("exec-2", "Apply patch")
            .with_content(ContentType::Diff, "+added\n-removed")
            .with_file_path("src/main.rs");
        assert_eq!(req.subject(), "Apply patch");
        assert_eq!(req.title, "Apply patch");
        assert!(req.has_content());
        assert_eq!(req.file_path.as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn test_whitespace_content_is_not_content() {
        let req = ConfirmationRequest::user("e", "t").with_content(ContentType::Text, "  \n ");
        assert!(!req.has_content());
    }

    #[test]
    fn test_backend_payload_with_missing_optionals() {
        let json = r#"{
            "execution_id": "abc",
            "kind": "tool",
            "subject": "write_file",
            "message": "Write 3 lines to notes.txt"
        }"#;
        let req: ConfirmationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.execution_id.as_str(), "abc");
        assert_eq!(req.content_type, ContentType::None);
        assert!(req.confirm_text.is_empty());
        assert!(req.file_path.is_none());
    }

    #[test]
    fn test_response_constructors() {
        let id = ExecutionId::new("x");
        assert!(ConfirmationResponse::accept(id.clone()).confirmed);
        assert!(!ConfirmationResponse::decline(id).confirmed);
    }
}
