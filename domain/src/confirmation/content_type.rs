//! Preview content type attached to a confirmation request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the content attached to a confirmation should be displayed.
///
/// The wire form is the lowercase name, with the empty string meaning
/// "no preview".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "diff")]
    Diff,
    #[serde(rename = "markdown")]
    Markdown,
    #[serde(rename = "text")]
    Text,
    #[default]
    #[serde(rename = "")]
    None,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Diff => "diff",
            ContentType::Markdown => "markdown",
            ContentType::Text => "text",
            ContentType::None => "",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "diff" => Ok(ContentType::Diff),
            "markdown" | "md" => Ok(ContentType::Markdown),
            "text" => Ok(ContentType::Text),
            "" => Ok(ContentType::None),
            other => Err(format!(
                "Unknown content type: '{}'. Valid: diff, markdown, text, or empty",
                other
            )),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
