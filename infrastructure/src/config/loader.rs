//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["confab.toml", ".confab.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `CONFAB_*` environment variables (`CONFAB_TUI__THEME=light`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./confab.toml` or `./.confab.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/confab/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        // An explicit path that does not exist is an error, not a silent default
        if let Some(path) = config_path.filter(|p| !p.exists()) {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }

        let global = Self::global_config_path().filter(|p| p.exists());
        let project = Self::project_config_path();
        Self::figment(global.as_deref(), project.as_deref(), config_path.map(PathBuf::as_path))
            .merge(Env::prefixed("CONFAB_").split("__"))
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(path) = global {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = project {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("confab").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used
    pub fn describe_sources() -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ENV  ] CONFAB_* environment variables".to_string());

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./confab.toml or ./.confab.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let marker = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{}] Global:  {}", marker, path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_application::AutoAcceptPolicy;
    use std::fs;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.tui.conversation_weight, 2);
        assert_eq!(config.tui.auxiliary_weight, 1);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("confab"));
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("confab.toml");
        let explicit = dir.path().join("explicit.toml");
        fs::write(&project, "[tui]\ntheme = \"light\"\ninput_height = 5\n").unwrap();
        fs::write(&explicit, "[tui]\ntheme = \"high-contrast\"\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(None, Some(&project), Some(&explicit))
            .extract()
            .unwrap();
        assert_eq!(config.tui.theme, "high-contrast");
        // Values only set at lower priority survive the merge
        assert_eq!(config.tui.input_height, 5);
    }

    #[test]
    fn test_global_tools_merge_with_project_tools() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("confab.toml");
        fs::write(&global, "[tools.read_file]\nauto_accept = true\n").unwrap();
        fs::write(&project, "[tools.run_command]\nauto_accept = true\n").unwrap();

        let config: FileConfig = ConfigLoader::figment(Some(&global), Some(&project), None)
            .extract()
            .unwrap();
        assert!(config.tools.auto_accept("read_file"));
        assert!(config.tools.auto_accept("run_command"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = ConfigLoader::load(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }
}
