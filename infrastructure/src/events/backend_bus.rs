//! In-memory backend event bus.
//!
//! Each topic gets a dedicated worker task fed by a bounded queue, so a slow
//! subscriber on one topic never delays another topic. `publish` never
//! blocks: when a topic's queue is full the event is dropped and counted.

use super::panic_message;
use confab_application::{
    BackendEvent, BackendTopic, BusError, EventBus, EventHandler, SubscriptionId,
};
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Per-topic queue depth
pub const DEFAULT_TOPIC_CAPACITY: usize = 256;

type HandlerMap = HashMap<BackendTopic, Vec<(SubscriptionId, EventHandler)>>;

struct TopicWorker {
    tx: mpsc::Sender<BackendEvent>,
    handle: JoinHandle<()>,
}

pub struct InMemoryEventBus {
    handlers: Arc<RwLock<HandlerMap>>,
    workers: Mutex<HashMap<BackendTopic, TopicWorker>>,
    capacity: usize,
    next_id: AtomicU64,
    dropped: AtomicU64,
    closed: AtomicBool,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TOPIC_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            workers: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of events discarded because a topic queue was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting events and wait for every worker to drain its queue.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let workers: Vec<(BackendTopic, TopicWorker)> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .collect();

        for (topic, worker) in workers {
            drop(worker.tx);
            if let Err(e) = worker.handle.await {
                warn!(topic = %topic, "topic worker ended abnormally: {}", e);
            }
        }
        debug!("backend event bus shut down");
    }

    /// Spawn the worker for `topic` on first use.
    ///
    /// Must be called from within a Tokio runtime.
    fn ensure_worker(&self, topic: BackendTopic) {
        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        if workers.contains_key(&topic) {
            return;
        }

        let (tx, rx) = mpsc::channel(self.capacity);
        let handle = tokio::spawn(run_worker(topic, rx, Arc::clone(&self.handlers)));
        workers.insert(topic, TopicWorker { tx, handle });
        debug!(topic = %topic, capacity = self.capacity, "started topic worker");
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_worker(
    topic: BackendTopic,
    mut rx: mpsc::Receiver<BackendEvent>,
    handlers: Arc<RwLock<HandlerMap>>,
) {
    while let Some(event) = rx.recv().await {
        // Snapshot so handlers may (un)subscribe without deadlocking
        let snapshot: Vec<EventHandler> = handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        trace!(topic = %topic, handlers = snapshot.len(), "delivering event");
        for handler in snapshot {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                warn!(
                    topic = %topic,
                    "event handler panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }
    debug!(topic = %topic, "topic worker stopped");
}

impl EventBus for InMemoryEventBus {
    fn publish(&self, event: BackendEvent) -> Result<(), BusError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BusError::Closed);
        }

        let topic = event.topic();
        let workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(worker) = workers.get(&topic) else {
            trace!(topic = %topic, "no subscribers, event discarded");
            return Ok(());
        };

        match worker.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!(topic = %topic, dropped_total = total, "topic queue full, event dropped");
                Err(BusError::QueueFull(topic))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(BusError::Closed),
        }
    }

    fn subscribe(&self, topic: BackendTopic, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push((id, handler));

        if !self.closed.load(Ordering::SeqCst) {
            self.ensure_worker(topic);
        }
        id
    }

    fn unsubscribe(&self, topic: BackendTopic, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = handlers.get_mut(&topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sub_id, _)| *sub_id != id);
        before != list.len()
    }
}
