use confab_domain::ExecutionId;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Execution ids remembered to refuse reuse.
pub const SEEN_CAPACITY: usize = 4096;

/// The most recent execution ids the coordinator has accepted.
///
/// Bounded: once full, the oldest id is forgotten and could be accepted
/// again. Backends mint fresh ids per request, so only a replay older than
/// [`SEEN_CAPACITY`] requests slips through.
#[derive(Debug)]
pub struct SeenIds {
    ids: LruCache<ExecutionId, ()>,
}

impl SeenIds {
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            ids: LruCache::new(capacity),
        }
    }

    /// Record `id`. Returns false if it is already remembered.
    pub fn insert(&mut self, id: &ExecutionId) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.put(id.clone(), ());
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl Default for SeenIds {
    fn default() -> Self {
        Self::with_capacity(NonZeroUsize::new(SEEN_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ExecutionId {
        ExecutionId::from(s)
    }

    #[test]
    fn test_refuses_repeats() {
        let mut seen = SeenIds::default();
        assert!(seen.insert(&id("a")));
        assert!(!seen.insert(&id("a")));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_oldest_id_is_forgotten_when_full() {
        let mut seen = SeenIds::with_capacity(NonZeroUsize::new(2).unwrap());
        assert!(seen.insert(&id("a")));
        assert!(seen.insert(&id("b")));
        assert!(seen.insert(&id("c")));

        assert_eq!(seen.len(), 2);
        assert!(!seen.insert(&id("b")));
        assert!(!seen.insert(&id("c")));
        assert!(seen.insert(&id("a")));
    }
}
