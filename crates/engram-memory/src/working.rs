//! Volatile working-memory buffer.
//!
//! Holds at most `capacity` items. Inserting past capacity evicts exactly
//! one item: the minimum by `(importance, timestamp)`, older timestamp
//! losing ties. Never touches persisted storage.

use engram_types::memory::WorkingMemoryItem;

/// Default number of items retained.
pub const DEFAULT_CAPACITY: usize = 10;

/// Capacity-bounded, importance-ranked buffer of recent context.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    items: Vec<WorkingMemoryItem>,
    capacity: usize,
}

impl WorkingMemory {
    /// Create an empty buffer with the given capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Insert an item; if the buffer overflows, evict the lowest-ranked item.
    ///
    /// Items are kept in insertion order. Eviction scans for the minimum
    /// `(importance, timestamp)` pair; a bounded min-heap would do the same
    /// job if the capacity ever grew beyond a handful of items.
    pub fn insert(&mut self, item: WorkingMemoryItem) {
        self.items.push(item);
        if self.items.len() > self.capacity {
            if let Some(min_idx) = self.min_rank_index() {
                self.items.remove(min_idx);
            }
        }
    }

    /// Index of the lowest-ranked item. `min_by` keeps the first of equal
    /// elements, which matches "older timestamp evicted first" because
    /// insertion order is chronological.
    fn min_rank_index(&self) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.rank_cmp(b))
            .map(|(idx, _)| idx)
    }

    /// Items sorted by descending `(importance, timestamp)` for context
    /// assembly. The buffer itself keeps insertion order.
    pub fn ranked_desc(&self) -> Vec<&WorkingMemoryItem> {
        let mut sorted: Vec<&WorkingMemoryItem> = self.items.iter().collect();
        sorted.sort_by(|a, b| b.rank_cmp(a));
        sorted
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[WorkingMemoryItem] {
        &self.items
    }

    /// Number of items currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
