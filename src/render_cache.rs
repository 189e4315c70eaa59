use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

pub const RENDER_CACHE_CAPACITY: usize = 1000;

/// Bounded memo store that evicts in insertion order.
///
/// A hit does not move an entry, so once more than `capacity` distinct keys
/// have been inserted the oldest one is dropped even if it is read often.
#[derive(Debug, Clone)]
pub struct FifoCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }

    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &V {
        if !self.entries.contains_key(&key) {
            let value = make();
            self.insert(key.clone(), value);
        }
        // The key was either present or just inserted, and capacity is at least 1.
        &self.entries[&key]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_inserted_first() {
        let mut cache = FifoCache::new(2);
        assert!(cache.is_empty());
        cache.insert("a", 1);
        cache.insert("b", 2);
        // Reading "a" does not protect it.
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.insert("c", 3);
        assert!(!cache.contains(&"a"));
        assert!(cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_or_insert_with_builds_only_on_miss() {
        let mut cache = FifoCache::new(2);
        let mut built = 0;
        for _ in 0..3 {
            cache.get_or_insert_with("a", || {
                built += 1;
                1
            });
        }
        assert_eq!(built, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn overwrite_keeps_original_slot() {
        let mut cache = FifoCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        cache.insert("c", 3);
        assert!(!cache.contains(&"a"));
        assert_eq!(cache.get(&"b"), Some(&2));
    }
}
