//! In-process memoization of decoded results

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identifier-keyed map guarded by its own lock
///
/// The lock is only held for a single lookup or insert. Values are cloned
/// out, so callers never hold the lock while doing I/O.
#[derive(Debug)]
pub struct Memo<T> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> Memo<T> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a previously stored value
    pub fn get(&self, identifier: &str) -> Option<T> {
        self.lock().get(identifier).cloned()
    }

    /// Store a value, replacing any earlier one
    pub fn insert(&self, identifier: &str, value: T) {
        self.lock().insert(identifier.to_string(), value);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written value in
    // the map, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}
