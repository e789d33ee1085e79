//! System clipboard access for `:yank`.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("could not write to clipboard: {0}")]
    Write(String),
}

/// Somewhere copied text can go.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The desktop clipboard through `arboard`.
///
/// A handle is opened per copy; a headless session only fails the copy
/// that needed it.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}
