//! Command event bus backed by Tokio tasks.
//!
//! `emit` snapshots the subscribers of a topic, removes the once-subscribers
//! in the same critical section, then hands every handler its own task.
//! The emitter never waits for a handler.

use super::panic_message;
use confab_application::{CommandBus, CommandEvent, CommandHandler, CommandTopic, SubscriptionId};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{trace, warn};

struct Subscriber {
    id: SubscriptionId,
    handler: CommandHandler,
    once: bool,
}

pub struct TokioCommandBus {
    subscribers: Mutex<HashMap<CommandTopic, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl TokioCommandBus {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn add(&self, topic: CommandTopic, handler: CommandHandler, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push(Subscriber { id, handler, once });
        id
    }

    /// Number of live subscribers for `topic`.
    pub fn subscriber_count(&self, topic: CommandTopic) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }
}

impl Default for TokioCommandBus {
    fn default() -> Self {
        Self::new()
    }
}

fn invoke(topic: CommandTopic, handler: CommandHandler, event: CommandEvent) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(event))) {
        warn!(
            topic = %topic,
            "command handler panicked: {}",
            panic_message(payload.as_ref())
        );
    }
}

impl CommandBus for TokioCommandBus {
    fn subscribe(&self, topic: CommandTopic, handler: CommandHandler) -> SubscriptionId {
        self.add(topic, handler, false)
    }

    fn subscribe_once(&self, topic: CommandTopic, handler: CommandHandler) -> SubscriptionId {
        self.add(topic, handler, true)
    }

    fn unsubscribe(&self, topic: CommandTopic, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = subscribers.get_mut(&topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|s| s.id != id);
        before != list.len()
    }

    fn emit(&self, event: CommandEvent) -> usize {
        let topic = event.topic();
        let handlers: Vec<CommandHandler> = {
            let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(list) = subscribers.get_mut(&topic) else {
                return 0;
            };
            let handlers = list.iter().map(|s| s.handler.clone()).collect();
            list.retain(|s| !s.once);
            handlers
        };

        trace!(topic = %topic, subscribers = handlers.len(), "emitting command event");
        let runtime = tokio::runtime::Handle::try_current();
        for handler in &handlers {
            let handler = handler.clone();
            let event = event.clone();
            match &runtime {
                Ok(rt) => {
                    rt.spawn(async move { invoke(topic, handler, event) });
                }
                Err(_) => {
                    std::thread::spawn(move || invoke(topic, handler, event));
                }
            }
        }
        handlers.len()
    }

    fn clear(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    fn forward_to(tx: mpsc::UnboundedSender<CommandEvent>) -> CommandHandler {
        Arc::new(move |event: CommandEvent| {
            let _ = tx.send(event);
        })
    }

    fn exploding_handler(_: CommandEvent) {
        panic!("subscriber failure");
    }

    #[tokio::test]
    async fn test_emit_reaches_every_subscriber() {
        let bus = TokioCommandBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe(CommandTopic::InputCancel, forward_to(tx.clone()));
        bus.subscribe(CommandTopic::InputCancel, forward_to(tx));

        assert_eq!(bus.emit(CommandEvent::InputCancel { confirmation: None }), 2);
        for _ in 0..2 {
            let got = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
            assert_eq!(got, Some(CommandEvent::InputCancel { confirmation: None }));
        }
    }

    #[tokio::test]
    async fn test_subscribe_once_is_removed_after_first_emit() {
        let bus = TokioCommandBus::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe_once(CommandTopic::ThemeChanged, forward_to(tx));

        assert_eq!(bus.emit(CommandEvent::ThemeChanged("light".into())), 1);
        assert_eq!(bus.subscriber_count(CommandTopic::ThemeChanged), 0);
        assert_eq!(bus.emit(CommandEvent::ThemeChanged("dark".into())), 0);

        let got = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some(CommandEvent::ThemeChanged("light".into())));
    }

    #[tokio::test]
    async fn test_failing_subscriber_is_isolated() {
        let bus = TokioCommandBus::new();
        bus.subscribe(CommandTopic::ShortcutHelp, Arc::new(exploding_handler));
        let (tx, mut rx) = mpsc::unbounded_channel();
        bus.subscribe(CommandTopic::ShortcutHelp, forward_to(tx));

        assert_eq!(bus.emit(CommandEvent::ShortcutHelp), 2);
        let got = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(got, Some(CommandEvent::ShortcutHelp));
    }

    #[tokio::test]
    async fn test_unsubscribe_and_clear() {
        let bus = TokioCommandBus::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = bus.subscribe(CommandTopic::InputText, forward_to(tx.clone()));
        bus.subscribe(CommandTopic::InputCancel, forward_to(tx));

        assert!(bus.unsubscribe(CommandTopic::InputText, id));
        assert!(!bus.unsubscribe(CommandTopic::InputText, id));
        assert_eq!(bus.emit(CommandEvent::InputText("hi".into())), 0);

        bus.clear();
        assert_eq!(bus.subscriber_count(CommandTopic::InputCancel), 0);
    }

    #[test]
    fn test_emit_without_runtime_still_delivers() {
        let bus = TokioCommandBus::new();
        let (tx, rx) = std::sync::mpsc::channel();
        bus.subscribe(
            CommandTopic::InputCancel,
            Arc::new(move |event: CommandEvent| {
                let _ = tx.send(event);
            }),
        );

        assert_eq!(bus.emit(CommandEvent::InputCancel { confirmation: None }), 1);
        let got = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(got, CommandEvent::InputCancel { confirmation: None });
    }
}
