//! TUI configuration from TOML (`[tui]` section)

use serde::{Deserialize, Serialize};

/// TUI configuration
///
/// Weights are relative shares of the centre row; the auxiliary viewer
/// only takes its share while it is visible.
///
/// # Example
///
/// ```toml
/// [tui]
/// theme = "default"
/// input_height = 3
/// conversation_weight = 2
/// auxiliary_weight = 1
/// zoomed_conversation_weight = 1
/// zoomed_auxiliary_weight = 4
/// tick_rate_ms = 250
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTuiConfig {
    /// Theme preset: "default", "light", "high-contrast"
    pub theme: String,
    /// Height of the input line including its border
    pub input_height: u16,
    /// Height of the status bar
    pub status_height: u16,
    pub conversation_weight: u16,
    pub auxiliary_weight: u16,
    pub zoomed_conversation_weight: u16,
    pub zoomed_auxiliary_weight: u16,
    /// Spinner / housekeeping tick interval
    pub tick_rate_ms: u64,
}

impl Default for FileTuiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            input_height: 3,
            status_height: 1,
            conversation_weight: 2,
            auxiliary_weight: 1,
            zoomed_conversation_weight: 1,
            zoomed_auxiliary_weight: 4,
            tick_rate_ms: 250,
        }
    }
}
