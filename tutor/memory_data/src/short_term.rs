use parking_lot::RwLock;
use std::collections::VecDeque;

/// Short-term memory implemented as a rolling FIFO buffer.
///
/// The buffer never holds more than `capacity` entries; pushing into a full
/// buffer evicts the oldest entry first.
#[derive(Debug)]
pub struct ShortTermMemory<T> {
    capacity: usize,
    entries: RwLock<VecDeque<T>>,
}

impl<T: Clone> Clone for ShortTermMemory<T> {
    fn clone(&self) -> Self {
        let snapshot = self.entries.read().clone();
        Self {
            capacity: self.capacity,
            entries: RwLock::new(snapshot),
        }
    }
}

impl<T: Clone> ShortTermMemory<T> {
    /// Creates a new buffer. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Appends an entry and returns whatever was evicted to stay within capacity.
    pub fn push(&self, entry: T) -> Vec<T> {
        let mut entries = self.entries.write();
        entries.push_back(entry);
        let mut evicted = Vec::new();
        while entries.len() > self.capacity {
            if let Some(oldest) = entries.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Returns a snapshot of all entries, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.read().iter().cloned().collect()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let memory = ShortTermMemory::new(2);
        assert!(memory.push("a").is_empty());
        assert!(memory.push("b").is_empty());
        assert_eq!(memory.push("c"), ["a"]);
        assert_eq!(memory.snapshot(), ["b", "c"]);
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let memory = ShortTermMemory::new(0);
        memory.push(1);
        memory.push(2);
        assert_eq!(memory.capacity(), 1);
        assert_eq!(memory.snapshot(), [2]);
    }

    #[test]
    fn clear_empties_buffer() {
        let memory = ShortTermMemory::new(4);
        memory.push("x");
        memory.clear();
        assert!(memory.is_empty());
    }
}
