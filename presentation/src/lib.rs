//! Presentation layer for confab
//!
//! This crate contains the CLI definition and the terminal UI: the panel
//! layout engine, the confirmation workflow and the main loop.

pub mod cli;
pub mod tui;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use tui::{LayoutConfig, ThemeName, TuiApp, TuiSettings};
