//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod auto_accept;
pub mod chat_backend;
pub mod command_bus;
pub mod event_bus;
