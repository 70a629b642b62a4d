//! Bounded URL → text map evicted in insertion order.

use std::collections::{HashMap, VecDeque};

/// Extracted-text cache with FIFO batch eviction.
///
/// Holds at most `capacity` entries. Inserting a new key into a full cache
/// first drops the `eviction_batch` oldest keys by insertion order; reads do
/// not refresh an entry's position.
#[derive(Debug)]
pub struct TextCache {
    entries: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: usize,
    eviction_batch: usize,
}

impl TextCache {
    pub fn new(capacity: usize, eviction_batch: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            eviction_batch: eviction_batch.clamp(1, capacity),
        }
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.entries.get(url).map(String::as_str)
    }

    /// Insert or overwrite an entry. Returns how many entries were evicted.
    ///
    /// Overwriting keeps the key's original insertion position.
    pub fn insert(&mut self, url: String, text: String) -> usize {
        if let Some(existing) = self.entries.get_mut(&url) {
            *existing = text;
            return 0;
        }

        let evicted = if self.entries.len() >= self.capacity { self.evict_oldest(self.eviction_batch) } else { 0 };

        self.order.push_back(url.clone());
        self.entries.insert(url, text);
        evicted
    }

    fn evict_oldest(&mut self, count: usize) -> usize {
        let mut evicted = 0;
        while evicted < count {
            let Some(oldest) = self.order.pop_front() else { break };
            self.entries.remove(&oldest);
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
