//! Backend event bus port.
//!
//! The backend and the UI talk over named topics with typed payloads.
//! Delivery is asynchronous: handlers run on bus-owned tasks, never on the
//! render loop, so UI-side handlers must repost what they receive into
//! the loop before touching any screen state.
//!
//! # Topics
//!
//! | topic | payload |
//! |---|---|
//! | `tool.confirmation.request` | [`ConfirmationRequest`] (kind = tool) |
//! | `tool.confirmation.response` | [`ConfirmationResponse`] |
//! | `user.confirmation.request` | [`ConfirmationRequest`] (kind = user) |
//! | `user.confirmation.response` | [`ConfirmationResponse`] |
//! | `chat.started` / `chat.chunk` / `chat.completed` / `chat.cancelled` / `chat.failed` | chat lifecycle |

use super::chat_backend::RequestId;
use confab_domain::{ConfirmationKind, ConfirmationRequest, ConfirmationResponse};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Named backend topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendTopic {
    ToolConfirmationRequest,
    ToolConfirmationResponse,
    UserConfirmationRequest,
    UserConfirmationResponse,
    ChatStarted,
    ChatChunk,
    ChatCompleted,
    ChatCancelled,
    ChatFailed,
}

impl BackendTopic {
    pub const ALL: [BackendTopic; 9] = [
        BackendTopic::ToolConfirmationRequest,
        BackendTopic::ToolConfirmationResponse,
        BackendTopic::UserConfirmationRequest,
        BackendTopic::UserConfirmationResponse,
        BackendTopic::ChatStarted,
        BackendTopic::ChatChunk,
        BackendTopic::ChatCompleted,
        BackendTopic::ChatCancelled,
        BackendTopic::ChatFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendTopic::ToolConfirmationRequest => "tool.confirmation.request",
            BackendTopic::ToolConfirmationResponse => "tool.confirmation.response",
            BackendTopic::UserConfirmationRequest => "user.confirmation.request",
            BackendTopic::UserConfirmationResponse => "user.confirmation.response",
            BackendTopic::ChatStarted => "chat.started",
            BackendTopic::ChatChunk => "chat.chunk",
            BackendTopic::ChatCompleted => "chat.completed",
            BackendTopic::ChatCancelled => "chat.cancelled",
            BackendTopic::ChatFailed => "chat.failed",
        }
    }

    pub fn confirmation_request(kind: ConfirmationKind) -> Self {
        match kind {
            ConfirmationKind::Tool => BackendTopic::ToolConfirmationRequest,
            ConfirmationKind::User => BackendTopic::UserConfirmationRequest,
        }
    }

    pub fn confirmation_response(kind: ConfirmationKind) -> Self {
        match kind {
            ConfirmationKind::Tool => BackendTopic::ToolConfirmationResponse,
            ConfirmationKind::User => BackendTopic::UserConfirmationResponse,
        }
    }
}

impl fmt::Display for BackendTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendTopic::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = BackendTopic::ALL.iter().map(|t| t.as_str()).collect();
                format!("Unknown topic: '{}'. Valid: {}", s, valid.join(", "))
            })
    }
}

/// Typed payloads carried by the backend bus
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    ConfirmationRequested(ConfirmationRequest),
    ConfirmationResolved {
        kind: ConfirmationKind,
        response: ConfirmationResponse,
    },
    ChatStarted {
        request_id: RequestId,
    },
    ChatChunk {
        request_id: RequestId,
        text: String,
    },
    ChatCompleted {
        request_id: RequestId,
    },
    ChatCancelled {
        request_id: RequestId,
    },
    ChatFailed {
        request_id: RequestId,
        error: String,
    },
}

impl BackendEvent {
    pub fn topic(&self) -> BackendTopic {
        match self {
            BackendEvent::ConfirmationRequested(req) => BackendTopic::confirmation_request(req.kind),
            BackendEvent::ConfirmationResolved { kind, .. } => {
                BackendTopic::confirmation_response(*kind)
            }
            BackendEvent::ChatStarted { .. } => BackendTopic::ChatStarted,
            BackendEvent::ChatChunk { .. } => BackendTopic::ChatChunk,
            BackendEvent::ChatCompleted { .. } => BackendTopic::ChatCompleted,
            BackendEvent::ChatCancelled { .. } => BackendTopic::ChatCancelled,
            BackendEvent::ChatFailed { .. } => BackendTopic::ChatFailed,
        }
    }
}

/// Identifies one subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Publish failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("event bus is shut down")]
    Closed,

    #[error("queue for topic '{0}' is full, event dropped")]
    QueueFull(BackendTopic),
}

/// Handler invoked for every event on a subscribed topic.
pub type EventHandler = Arc<dyn Fn(&BackendEvent) + Send + Sync>;

/// Port for the backend event bus.
pub trait EventBus: Send + Sync {
    /// Enqueue an event for delivery. Never blocks the caller.
    fn publish(&self, event: BackendEvent) -> Result<(), BusError>;

    /// Register a handler for one topic.
    fn subscribe(&self, topic: BackendTopic, handler: EventHandler) -> SubscriptionId;

    /// Remove a handler. Returns false if it was not registered.
    fn unsubscribe(&self, topic: BackendTopic, id: SubscriptionId) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_domain::ExecutionId;

    #[test]
    fn test_topic_follows_confirmation_kind() {
        let tool = BackendEvent::ConfirmationRequested(ConfirmationRequest::tool("a", "shell"));
        let user = BackendEvent::ConfirmationRequested(ConfirmationRequest::user("b", "Apply"));
        assert_eq!(tool.topic(), BackendTopic::ToolConfirmationRequest);
        assert_eq!(user.topic(), BackendTopic::UserConfirmationRequest);

        let resolved = BackendEvent::ConfirmationResolved {
            kind: ConfirmationKind::User,
            response: ConfirmationResponse::accept(ExecutionId::new("b")),
        };
        assert_eq!(resolved.topic().as_str(), "user.confirmation.response");
    }

    #[test]
    fn test_topic_from_str() {
        assert_eq!(
            "chat.chunk".parse::<BackendTopic>().unwrap(),
            BackendTopic::ChatChunk
        );
        let err = "chat.unknown".parse::<BackendTopic>().unwrap_err();
        assert!(err.contains("tool.confirmation.request"));
    }
}
