//
//  cache.rs
//  Traffic
//
//  Created by hak (tharun)
//

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

/// Lazily filled memo table for query results.
///
/// Entries are never invalidated: every engine that owns a `Memo` reads from an
/// immutable snapshot, so a computed value stays correct for the memo's lifetime.
/// Keys are the query parameters themselves (tuples where a query takes several).
#[derive(Debug)]
pub(crate) struct Memo<K, V> {
    entries: RefCell<HashMap<K, V>>,
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, computing and storing it on first use.
    pub(crate) fn ensure(&self, key: K, compute: impl FnOnce() -> V) -> V {
        let cached = self.entries.borrow().get(&key).cloned();
        if let Some(value) = cached {
            return value;
        }
        // The borrow is released before computing so `compute` may consult other memos.
        let value = compute();
        self.entries.borrow_mut().insert(key, value.clone());
        value
    }

    /// Fallible variant of [`Memo::ensure`]. Errors are returned and not cached.
    pub(crate) fn try_ensure<E>(
        &self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        let cached = self.entries.borrow().get(&key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }
        let value = compute()?;
        self.entries.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<K, V> Default for Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
