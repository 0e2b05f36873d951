//! Work item identifiers and the generators that hand them out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Unique identifier of a [`WorkItem`](crate::WorkItem). Used as the
/// cancellation key; never reused within one generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Source of fresh [`ItemId`]s.
///
/// Passed into [`WorkItem::with_ids`](crate::WorkItem::with_ids) so tests can
/// control id sequencing instead of sharing the process-wide counter.
///
/// Ids are only unique per generator. Items submitted to one scheduler must
/// draw from a single generator (or from disjoint ranges, see
/// [`AtomicIdGenerator::starting_at`]); otherwise two queued items can share
/// an id and a single `cancel` discards only one of them.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ItemId;
}

/// Monotonic counter-backed generator. The first id handed out is 1, the
/// same as [`AtomicIdGenerator::global`], so a private generator overlaps
/// the global sequence unless built with `starting_at`.
#[derive(Debug)]
pub struct AtomicIdGenerator {
    next: AtomicU64,
}

impl AtomicIdGenerator {
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide generator used by [`WorkItem::new`](crate::WorkItem::new).
    pub fn global() -> &'static AtomicIdGenerator {
        static GLOBAL: OnceLock<AtomicIdGenerator> = OnceLock::new();
        GLOBAL.get_or_init(AtomicIdGenerator::new)
    }
}

impl Default for AtomicIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for AtomicIdGenerator {
    fn next_id(&self) -> ItemId {
        ItemId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn local_generator_is_sequential() {
        let ids = AtomicIdGenerator::new();
        assert_eq!(ids.next_id(), ItemId::new(1));
        assert_eq!(ids.next_id(), ItemId::new(2));
        assert_eq!(ids.next_id(), ItemId::new(3));
    }

    #[test]
    fn starting_at_offsets_sequence() {
        let ids = AtomicIdGenerator::starting_at(100);
        assert_eq!(ids.next_id().as_u64(), 100);
        assert_eq!(ids.next_id().as_u64(), 101);
    }

    #[test]
    fn global_generator_never_repeats_across_threads() {
        let seen = Arc::new(std::sync::Mutex::new(HashSet::new()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seen = Arc::clone(&seen);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        let id = AtomicIdGenerator::global().next_id();
                        assert!(seen.lock().unwrap().insert(id), "duplicate id {id}");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(seen.lock().unwrap().len(), 1000);
    }

    #[test]
    fn display_has_prefix() {
        assert_eq!(ItemId::new(7).to_string(), "item-7");
    }
}
