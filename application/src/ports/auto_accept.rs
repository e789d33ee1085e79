//! Auto-accept policy port.
//!
//! Looked up each time a confirmation request arrives, so configuration
//! reloads take effect for the next request.

/// Decides whether a confirmation can be resolved without asking.
pub trait AutoAcceptPolicy: Send + Sync {
    /// `subject` is the tool name for tool requests and the title for
    /// user requests.
    fn auto_accept(&self, subject: &str) -> bool;

    /// Whether an auto-accepted subject should stay silent in the
    /// conversation.
    fn is_hidden(&self, _subject: &str) -> bool {
        false
    }
}

/// Policy that always asks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverAutoAccept;

impl AutoAcceptPolicy for NeverAutoAccept {
    fn auto_accept(&self, _subject: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_auto_accept() {
        let policy = NeverAutoAccept;
        assert!(!policy.auto_accept("run_command"));
        assert!(!policy.is_hidden("run_command"));
    }
}
