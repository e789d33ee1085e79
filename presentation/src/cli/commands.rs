//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for confab
#[derive(Parser, Debug)]
#[command(name = "confab")]
#[command(author, version, about = "Terminal conversation UI with serialized confirmation prompts")]
#[command(long_about = r#"
confab is a terminal chat front-end. Replies stream into the conversation
panel while approval requests from the backend are queued and shown one at
a time in place of the input line, with diffs and markdown previewed in a
side viewer.

Configuration files are loaded from (in priority order):
1. CONFAB_* environment variables (e.g. CONFAB_TUI__THEME=light)
2. --config <path>     Explicit config file
3. ./confab.toml       Project-level config
4. ~/.config/confab/config.toml   Global config

Logs are written to a file, never to the terminal the UI is drawn on.

Example:
  confab
  confab --theme high-contrast -vv
  confab --config ./ci.toml --log-file /tmp/confab.log
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Theme preset, overriding the config file (default, light, high-contrast)
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Log file path (default: <data dir>/confab/confab.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Where logs go when `--log-file` is not given.
    pub fn default_log_file() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("confab")
            .join("confab.log")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(Self::default_log_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "confab",
            "-vv",
            "--theme",
            "light",
            "--log-file",
            "/tmp/x.log",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.theme.as_deref(), Some("light"));
        assert_eq!(cli.log_file(), PathBuf::from("/tmp/x.log"));
        assert!(!cli.no_config);
    }

    #[test]
    fn test_default_log_file_name() {
        let cli = Cli::parse_from(["confab"]);
        assert!(cli.log_file().ends_with("confab/confab.log"));
    }
}
