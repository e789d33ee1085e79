//! Application layer for confab
//!
//! This crate contains the port definitions consumed by the presentation
//! layer and implemented by infrastructure adapters, together with the
//! event vocabularies carried by the two buses.
//! It depends only on the domain layer.

pub mod ports;

// Re-export commonly used types
pub use ports::{
    auto_accept::{AutoAcceptPolicy, NeverAutoAccept},
    chat_backend::{ChatBackend, RequestId},
    command_bus::{CommandBus, CommandEvent, CommandHandler, CommandTopic},
    event_bus::{BackendEvent, BackendTopic, BusError, EventBus, EventHandler, SubscriptionId},
};
