//! Local echo backend.
//!
//! Streams a canned reply word by word over the backend bus so the UI can
//! be driven without a real conversational engine.

use async_trait::async_trait;
use confab_application::{BackendEvent, ChatBackend, EventBus, RequestId};
use confab_domain::DomainError;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct DemoChatBackend {
    bus: Arc<dyn EventBus>,
    chunk_delay: Duration,
    next_id: AtomicU64,
}

impl DemoChatBackend {
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            bus,
            chunk_delay: Duration::from_millis(40),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    fn publish(&self, event: BackendEvent) {
        if let Err(e) = self.bus.publish(event) {
            warn!("demo backend could not publish: {}", e);
        }
    }

    fn compose_reply(prompt: &str) -> String {
        format!(
            "You said: \"{}\". This is the demo backend; try :demo diff, :demo markdown or :demo tool to see confirmations.",
            prompt.trim()
        )
    }
}

#[async_trait]
impl ChatBackend for DemoChatBackend {
    async fn send(
        &self,
        prompt: String,
        cancel: CancellationToken,
    ) -> Result<RequestId, DomainError> {
        let request_id = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.publish(BackendEvent::ChatStarted { request_id });

        if prompt.trim().is_empty() {
            let error = "prompt is empty".to_string();
            self.publish(BackendEvent::ChatFailed {
                request_id,
                error: error.clone(),
            });
            return Err(DomainError::InvalidRequest(error));
        }

        let reply = Self::compose_reply(&prompt);
        for word in reply.split_inclusive(' ') {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%request_id, "demo reply cancelled");
                    self.publish(BackendEvent::ChatCancelled { request_id });
                    return Err(DomainError::Cancelled);
                }
                _ = tokio::time::sleep(self.chunk_delay) => {}
            }
            self.publish(BackendEvent::ChatChunk {
                request_id,
                text: word.to_string(),
            });
        }

        self.publish(BackendEvent::ChatCompleted { request_id });
        Ok(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_application::{BackendTopic, BusError, EventHandler, SubscriptionId};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBus {
        events: Mutex<Vec<BackendEvent>>,
    }

    impl EventBus for RecordingBus {
        fn publish(&self, event: BackendEvent) -> Result<(), BusError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }

        fn subscribe(&self, _topic: BackendTopic, _handler: EventHandler) -> SubscriptionId {
            SubscriptionId(0)
        }

        fn unsubscribe(&self, _topic: BackendTopic, _id: SubscriptionId) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_streams_reply_then_completes() {
        let bus = Arc::new(RecordingBus::default());
        let backend = DemoChatBackend::new(bus.clone()).with_chunk_delay(Duration::ZERO);

        let id = backend
            .send("hello".into(), CancellationToken::new())
            .await
            .unwrap();

        let events = bus.events.lock().unwrap();
        assert_eq!(events.first(), Some(&BackendEvent::ChatStarted { request_id: id }));
        assert_eq!(events.last(), Some(&BackendEvent::ChatCompleted { request_id: id }));

        let streamed: String = events
            .iter()
            .filter_map(|e| match e {
                BackendEvent::ChatChunk { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(streamed, DemoChatBackend::compose_reply("hello"));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_stream() {
        let bus = Arc::new(RecordingBus::default());
        let backend = DemoChatBackend::new(bus.clone()).with_chunk_delay(Duration::ZERO);
        let token = CancellationToken::new();
        token.cancel();

        let err = backend.send("hello".into(), token).await.unwrap_err();
        assert!(err.is_cancelled());

        let events = bus.events.lock().unwrap();
        assert!(matches!(events.last(), Some(BackendEvent::ChatCancelled { .. })));
        assert!(!events.iter().any(|e| matches!(e, BackendEvent::ChatChunk { .. })));
    }

    #[tokio::test]
    async fn test_empty_prompt_fails() {
        let bus = Arc::new(RecordingBus::default());
        let backend = DemoChatBackend::new(bus.clone());

        let err = backend.send("   ".into(), CancellationToken::new()).await;
        assert!(matches!(err, Err(DomainError::InvalidRequest(_))));
        assert!(matches!(
            bus.events.lock().unwrap().last(),
            Some(BackendEvent::ChatFailed { .. })
        ));
    }
}
