//! Infrastructure layer for confab
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod chat;
pub mod config;
pub mod events;

// Re-export commonly used types
pub use chat::DemoChatBackend;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileToolConfig, FileToolsConfig,
    FileTuiConfig,
};
pub use events::{InMemoryEventBus, TokioCommandBus};
