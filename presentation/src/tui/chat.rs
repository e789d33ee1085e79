//! Chat controller: one backend exchange at a time, cancellable

use super::event::AppEvent;
use confab_application::ChatBackend;
use confab_domain::DomainError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    events: mpsc::UnboundedSender<AppEvent>,
    /// Generation and token of the running exchange
    active: Option<(u64, CancellationToken)>,
    next_generation: u64,
}

impl ChatController {
    pub fn new(backend: Arc<dyn ChatBackend>, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            backend,
            events,
            active: None,
            next_generation: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Start an exchange on a background task.
    ///
    /// The task posts [`AppEvent::ChatFinished`] when `send` returns.
    pub fn submit(&mut self, prompt: String) -> Result<u64, DomainError> {
        if self.active.is_some() {
            return Err(DomainError::Busy);
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let token = CancellationToken::new();
        self.active = Some((generation, token.clone()));

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            match backend.send(prompt, token).await {
                Ok(request_id) => debug!(%request_id, "Chat exchange finished"),
                Err(e) if e.is_cancelled() => debug!("Chat exchange cancelled"),
                Err(e) => {
                    warn!(error = %e, "Chat exchange failed");
                    let _ = events.send(AppEvent::Diagnostic(format!("chat failed: {}", e)));
                }
            }
            let _ = events.send(AppEvent::ChatFinished(generation));
        });
        Ok(generation)
    }

    /// Cancel the running exchange. Returns false when idle.
    pub fn cancel(&mut self) -> bool {
        match &self.active {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Mark `generation` as done; stale generations are ignored.
    pub fn finish(&mut self, generation: u64) {
        if self.active.as_ref().is_some_and(|(g, _)| *g == generation) {
            self.active = None;
        }
    }
}
