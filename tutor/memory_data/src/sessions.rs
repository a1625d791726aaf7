use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::short_term::ShortTermMemory;

/// Records kept per session unless configured otherwise.
pub const DEFAULT_MEMORY_SIZE: usize = 10;

/// Per-session bounded interaction log.
///
/// Each session owns its own [`ShortTermMemory`], so appends to one session
/// serialize on that session's lock only. Appends hold the map read lock
/// while storing, so they never race a [`clear`](Self::clear) of the same
/// session. Sessions are created on first append and live until cleared.
#[derive(Debug)]
pub struct SessionStore<T> {
    capacity: usize,
    sessions: RwLock<IndexMap<String, Arc<ShortTermMemory<T>>>>,
}

impl<T: Clone> SessionStore<T> {
    /// Creates a store whose sessions retain at most `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            sessions: RwLock::new(IndexMap::new()),
        }
    }

    /// Per-session capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a record, evicting the session's oldest records beyond capacity.
    /// Returns the number of evicted records.
    ///
    /// The map lock is held until the record is stored, so a concurrent
    /// [`clear`](Self::clear) either drops the record with the session or runs
    /// after it and leaves a fresh session holding it.
    pub fn append(&self, session_id: &str, record: T) -> usize {
        {
            let sessions = self.sessions.read();
            if let Some(memory) = sessions.get(session_id) {
                return memory.push(record).len();
            }
        }
        let mut sessions = self.sessions.write();
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(ShortTermMemory::new(self.capacity)))
            .push(record)
            .len()
    }

    /// Current records of a session, oldest first. Unknown sessions are empty.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Vec<T> {
        self.sessions
            .read()
            .get(session_id)
            .map(|memory| memory.snapshot())
            .unwrap_or_default()
    }

    /// Drops a session. Returns whether it existed.
    pub fn clear(&self, session_id: &str) -> bool {
        self.sessions.write().shift_remove(session_id).is_some()
    }

    /// Whether a session has been created.
    #[must_use]
    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().contains_key(session_id)
    }

    /// Session ids in creation order.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}

impl<T: Clone> Default for SessionStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}
