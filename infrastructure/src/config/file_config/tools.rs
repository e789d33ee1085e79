//! Per-tool confirmation settings (`[tools.<name>]` tables)

use confab_application::AutoAcceptPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings for one confirmation subject.
///
/// # Example
///
/// ```toml
/// [tools.read_file]
/// auto_accept = true
/// hide = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolConfig {
    /// Suppress the conversation notice when the subject is auto-accepted
    pub hide: bool,
    /// Resolve confirmations for this subject without prompting
    pub auto_accept: bool,
}

/// The whole `[tools]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileToolsConfig(BTreeMap<String, FileToolConfig>);

impl FileToolsConfig {
    pub fn get(&self, subject: &str) -> Option<&FileToolConfig> {
        self.0.get(subject)
    }

    pub fn insert(&mut self, subject: impl Into<String>, config: FileToolConfig) {
        self.0.insert(subject.into(), config);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl AutoAcceptPolicy for FileToolsConfig {
    fn auto_accept(&self, subject: &str) -> bool {
        self.get(subject).is_some_and(|c| c.auto_accept)
    }

    fn is_hidden(&self, subject: &str) -> bool {
        self.get(subject).is_some_and(|c| c.hide)
    }
}
