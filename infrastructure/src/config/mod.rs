//! Configuration file loading for confab
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONFAB_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./confab.toml` or `./.confab.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/confab/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileToolConfig, FileToolsConfig, FileTuiConfig,
};
pub use loader::ConfigLoader;
