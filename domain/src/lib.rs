//! Domain layer for confab
//!
//! This crate contains the entities and value objects shared by every layer.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Confirmations
//!
//! A backend that wants a yes/no decision from the user sends a
//! [`ConfirmationRequest`]. The UI answers with exactly one
//! [`ConfirmationResponse`], correlated only by the execution id.
//!
//! - **Tool** confirmations come from backend safety gates guarding a tool call
//! - **User** confirmations carry a richer preview (diff, markdown, text)
//!
//! ## Conversation
//!
//! [`ChatMessage`] entries form the conversation shown in the main panel.

pub mod chat;
pub mod confirmation;
pub mod core;

// Re-export commonly used types
pub use chat::{ChatMessage, MessageRole};
pub use confirmation::{
    content_type::ContentType,
    request::{ConfirmationKind, ConfirmationRequest, ConfirmationResponse, ExecutionId},
};
pub use core::error::DomainError;
