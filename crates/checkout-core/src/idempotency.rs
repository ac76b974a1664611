//! # Processed-Event Store
//!
//! Dedup bookkeeping for at-least-once webhook delivery. The store is
//! injected behind a trait so tests use the in-memory map and production
//! can swap in an external keyed store with a uniqueness constraint.
//!
//! `claim` is a single atomic check-and-insert: under concurrent delivery
//! of the same event id exactly one caller wins, so the membership check
//! and the mark cannot race.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Idempotency store for webhook event identifiers.
pub trait ProcessedEventStore: Send + Sync {
    /// Atomically mark `event_id` as being processed.
    ///
    /// Returns `true` if this call claimed the id, `false` if it was
    /// already claimed (duplicate delivery).
    fn claim(&self, event_id: &str) -> bool;

    /// Undo a claim after a dispatch failure, so the provider's redelivery
    /// of the same event is reprocessed.
    fn release(&self, event_id: &str);

    /// Whether the id is currently marked processed.
    fn contains(&self, event_id: &str) -> bool;
}

/// Type alias for a shared processed-event store
pub type BoxedProcessedEventStore = Arc<dyn ProcessedEventStore>;

/// In-memory store: process-lifetime, unbounded, reset on restart.
///
/// Not a durable dedup store; cross-restart idempotency is out of scope.
#[derive(Debug, Default)]
pub struct InMemoryProcessedEvents {
    seen: Mutex<HashSet<String>>,
}

impl InMemoryProcessedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids currently marked (test/introspection helper)
    pub fn len(&self) -> usize {
        self.seen.lock().expect("processed-event lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProcessedEventStore for InMemoryProcessedEvents {
    fn claim(&self, event_id: &str) -> bool {
        self.seen
            .lock()
            .expect("processed-event lock poisoned")
            .insert(event_id.to_string())
    }

    fn release(&self, event_id: &str) {
        self.seen
            .lock()
            .expect("processed-event lock poisoned")
            .remove(event_id);
    }

    fn contains(&self, event_id: &str) -> bool {
        self.seen
            .lock()
            .expect("processed-event lock poisoned")
            .contains(event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_first_wins() {
        let store = InMemoryProcessedEvents::new();

        assert!(store.claim("evt_1"));
        assert!(!store.claim("evt_1"));
        assert!(store.contains("evt_1"));
        assert!(store.claim("evt_2"));
    }

    #[test]
    fn test_release_allows_reclaim() {
        let store = InMemoryProcessedEvents::new();

        assert!(store.claim("evt_1"));
        store.release("evt_1");
        assert!(!store.contains("evt_1"));
        assert!(store.claim("evt_1"));
    }

    #[test]
    fn test_release_unknown_id_is_noop() {
        let store = InMemoryProcessedEvents::new();
        store.release("evt_never_seen");
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_claims_single_winner() {
        let store = Arc::new(InMemoryProcessedEvents::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.claim("evt_contended"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().expect("claim thread panicked"))
            .filter(|claimed| *claimed)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
