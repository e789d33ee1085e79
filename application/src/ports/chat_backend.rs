//! Chat backend port.
//!
//! The backend streams its reply as `chat.*` events on the backend bus;
//! `send` resolves once the exchange has finished, failed, or been
//! cancelled through the token.

use async_trait::async_trait;
use confab_domain::DomainError;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Correlates the `chat.*` events of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-{}", self.0)
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one user prompt.
    ///
    /// Returns [`DomainError::Cancelled`] when `cancel` fires first.
    async fn send(
        &self,
        prompt: String,
        cancel: CancellationToken,
    ) -> Result<RequestId, DomainError>;
}
