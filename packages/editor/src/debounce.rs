//! Cancel-and-restart commit timers, one per field.
//!
//! Time is passed in by the caller, so the host's event loop decides when
//! to poll and tests stay deterministic.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default quiet period before a content edit commits
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Pending<V> {
    value: V,
    due: Instant,
}

#[derive(Debug)]
pub struct FieldDebouncer<K, V> {
    delay: Duration,
    pending: HashMap<K, Pending<V>>,
}

impl<K: Eq + Hash + Clone, V> Default for FieldDebouncer<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<K: Eq + Hash + Clone, V> FieldDebouncer<K, V> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` for `key`, replacing and restarting any pending one
    pub fn push(&mut self, key: K, value: V, now: Instant) {
        self.pending.insert(
            key,
            Pending {
                value,
                due: now + self.delay,
            },
        );
    }

    /// Take every value whose quiet period has elapsed, oldest deadline first
    pub fn take_due(&mut self, now: Instant) -> Vec<(K, V)> {
        let mut ready: Vec<(K, Instant)> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .map(|(key, pending)| (key.clone(), pending.due))
            .collect();
        ready.sort_by_key(|(_, due)| *due);

        ready
            .into_iter()
            .filter_map(|(key, _)| self.pending.remove(&key).map(|p| (key, p.value)))
            .collect()
    }

    /// Take everything regardless of deadlines
    pub fn flush(&mut self) -> Vec<(K, V)> {
        let mut all: Vec<(K, Pending<V>)> = self.pending.drain().collect();
        all.sort_by_key(|(_, pending)| pending.due);
        all.into_iter().map(|(key, p)| (key, p.value)).collect()
    }

    pub fn cancel(&mut self, key: &K) -> Option<V> {
        self.pending.remove(key).map(|p| p.value)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }

    /// Earliest deadline, for hosts that sleep until the next commit
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due).min()
    }
}
