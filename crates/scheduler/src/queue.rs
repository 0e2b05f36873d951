//! Priority-ordered ready queue with lazy cancellation.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

use crate::id::ItemId;
use crate::item::WorkItem;

/// Heap entry. The max-heap pops the greatest entry, so "greater" means
/// higher priority, then earlier `created_at`, then earlier `seq`.
struct QueuedItem {
    priority: i64,
    created_at: Instant,
    /// Insertion sequence; breaks `created_at` ties so equal-priority
    /// items keep submission order exactly.
    seq: u64,
    item: WorkItem,
}

impl PartialEq for QueuedItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedItem {}

impl PartialOrd for QueuedItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.created_at.cmp(&self.created_at))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Result of taking the head of the queue.
#[derive(Debug)]
pub enum Dequeued {
    /// Hand this item to a worker.
    Ready(WorkItem),
    /// The head was cancelled; it has been dropped unexecuted.
    Cancelled(ItemId),
}

/// Ready queue plus the cancellation side-set.
///
/// Cancellation never searches the heap: the id is recorded and the item is
/// discarded when it reaches the head. Only ids currently queued are
/// recorded, so the side-set stays bounded by the queue length.
#[derive(Default)]
pub struct ReadyQueue {
    heap: BinaryHeap<QueuedItem>,
    /// Queued ids (with multiplicity, in case a caller reuses ids).
    queued: HashMap<ItemId, usize>,
    cancelled: HashSet<ItemId>,
    next_seq: u64,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of recorded cancellations not yet consumed.
    pub fn pending_cancellations(&self) -> usize {
        self.cancelled.len()
    }

    pub fn push(&mut self, item: WorkItem) {
        let seq = self.next_seq;
        self.next_seq += 1;
        *self.queued.entry(item.id()).or_insert(0) += 1;
        self.heap.push(QueuedItem {
            priority: item.priority(),
            created_at: item.created_at(),
            seq,
            item,
        });
    }

    /// Record a cancellation. Returns `false` (and records nothing) when the
    /// id is not waiting in the queue: already running, finished, discarded,
    /// or never submitted.
    pub fn cancel(&mut self, id: ItemId) -> bool {
        if self.queued.contains_key(&id) {
            self.cancelled.insert(id)
        } else {
            false
        }
    }

    /// Remove the head: highest priority, then earliest timestamp.
    pub fn pop(&mut self) -> Option<Dequeued> {
        let entry = self.heap.pop()?;
        let id = entry.item.id();
        if let Entry::Occupied(mut slot) = self.queued.entry(id) {
            *slot.get_mut() -= 1;
            if *slot.get() == 0 {
                slot.remove();
            }
        }
        if self.cancelled.remove(&id) {
            Some(Dequeued::Cancelled(id))
        } else {
            Some(Dequeued::Ready(entry.item))
        }
    }

    /// Drop everything still queued, returning how many items were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        self.queued.clear();
        self.cancelled.clear();
        dropped
    }
}
