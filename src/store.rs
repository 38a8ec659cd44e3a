//! keyed in-memory store for frames and fitted models
//!
//! The solver treats storage as a plain addressable map: publish exactly once
//! per successful fit, retrieve by key, remove explicitly. Values are shared
//! out as `Arc`s so published models stay immutable.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An opaque identifier addressing a published value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    pub fn make(name: impl Into<String>) -> Self {
        Key(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A thread-safe keyed store.
#[derive(Debug)]
pub struct Store<V> {
    slots: RwLock<HashMap<Key, Arc<V>>>,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Store::new()
    }
}

impl<V> Store<V> {
    pub fn new() -> Self {
        Store {
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Key, Arc<V>>> {
        match self.slots.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Key, Arc<V>>> {
        match self.slots.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Publishes a value under the key, replacing any previous occupant, and
    /// hands the key back as the retrieval handle.
    pub fn publish(&self, key: Key, value: V) -> Key {
        self.write().insert(key.clone(), Arc::new(value));
        key
    }

    pub fn get(&self, key: &Key) -> Option<Arc<V>> {
        self.read().get(key).cloned()
    }

    /// Removes the value under the key; returns whether anything was there.
    pub fn remove(&self, key: &Key) -> bool {
        self.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_get_remove_roundtrip() {
        let store: Store<u32> = Store::new();
        let key = store.publish(Key::make("model"), 7);
        assert_eq!(store.get(&key).map(|v| *v), Some(7));
        assert!(store.remove(&key));
        assert!(store.get(&key).is_none());
        assert!(!store.remove(&key));
    }

    #[test]
    fn publish_replaces_previous_value() {
        let store: Store<u32> = Store::new();
        let key = store.publish(Key::make("model"), 1);
        store.publish(Key::make("model"), 2);
        assert_eq!(store.get(&key).map(|v| *v), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn retrieved_values_outlive_removal() {
        let store: Store<String> = Store::new();
        let key = store.publish(Key::make("m"), "kept".to_string());
        let held = store.get(&key).unwrap();
        store.remove(&key);
        assert_eq!(held.as_str(), "kept");
    }
}
