//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; the binary maps them onto the
//! presentation layer's own settings types.

mod tools;
mod tui;

pub use tools::{FileToolConfig, FileToolsConfig};
pub use tui::FileTuiConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("tui.{0} must be greater than 0")]
    ZeroWeight(&'static str),

    #[error("tui.input_height must be at least 3 (got {0})")]
    InputTooShort(u16),

    #[error("tui.tick_rate_ms cannot be 0")]
    InvalidTickRate,

    #[error("tool name cannot be empty")]
    EmptyToolName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// TUI settings
    pub tui: FileTuiConfig,
    /// Per-tool confirmation settings, keyed by tool name or prompt title
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let tui = &self.tui;
        for (name, value) in [
            ("conversation_weight", tui.conversation_weight),
            ("auxiliary_weight", tui.auxiliary_weight),
            ("zoomed_conversation_weight", tui.zoomed_conversation_weight),
            ("zoomed_auxiliary_weight", tui.zoomed_auxiliary_weight),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroWeight(name));
            }
        }

        // Border plus one line of text
        if tui.input_height < 3 {
            return Err(ConfigValidationError::InputTooShort(tui.input_height));
        }

        if tui.tick_rate_ms == 0 {
            return Err(ConfigValidationError::InvalidTickRate);
        }

        if self.tools.names().any(|name| name.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyToolName);
        }

        Ok(())
    }
}
