// A HashMap with a maximum capacity that evicts least-recently-used entries
// once that capacity is exceeded. Used by the PLI cache's bounded mode
// (§5 resource policy) to keep memory under control for wide datasets
// where the 2^m PLI population would otherwise be unbounded.

use std::collections::HashMap;
use std::hash::Hash;

pub struct BoundedHashMap<K: Eq + Hash + Clone, V> {
    map: HashMap<K, V>,
    access_order: Vec<K>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> BoundedHashMap<K, V> {
    /// # Panics
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedHashMap capacity must be > 0");
        Self {
            map: HashMap::with_capacity(capacity),
            access_order: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts `key` -> `value`, evicting the least-recently-used entry if
    /// this would exceed capacity and `key` is new. Returns the old value
    /// and, if an eviction happened, the evicted key.
    pub fn insert(&mut self, key: K, value: V) -> (Option<V>, Option<K>) {
        self.access_order.retain(|k| k != &key);
        self.access_order.push(key.clone());

        let mut evicted = None;
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            if !self.access_order.is_empty() {
                let lru_key = self.access_order.remove(0);
                self.map.remove(&lru_key);
                evicted = Some(lru_key);
            }
        }

        (self.map.insert(key, value), evicted)
    }

    /// Looks up `key`, marking it most-recently-used on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.map.contains_key(key) {
            self.access_order.retain(|k| k != key);
            self.access_order.push(key.clone());
            self.map.get(key)
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_operations() {
        let mut map = BoundedHashMap::new(3);
        assert!(map.is_empty());
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&"a"), Some(&1));
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut map = BoundedHashMap::new(3);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        map.insert("d", 4);

        assert_eq!(map.len(), 3);
        assert!(map.get(&"a").is_none());
        assert!(map.get(&"b").is_some());
        assert!(map.get(&"c").is_some());
        assert!(map.get(&"d").is_some());
    }

    #[test]
    fn access_refreshes_recency() {
        let mut map = BoundedHashMap::new(3);
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);

        map.get(&"a");
        map.insert("d", 4);

        assert!(map.get(&"a").is_some());
        assert!(map.get(&"b").is_none());
        assert!(map.get(&"c").is_some());
        assert!(map.get(&"d").is_some());
    }

    #[test]
    #[should_panic(expected = "BoundedHashMap capacity must be > 0")]
    fn zero_capacity_panics() {
        let _ = BoundedHashMap::<String, i32>::new(0);
    }

    #[test]
    fn insert_reports_the_evicted_key() {
        let mut map = BoundedHashMap::new(2);
        assert_eq!(map.insert("a", 1), (None, None));
        assert_eq!(map.insert("b", 2), (None, None));
        assert_eq!(map.insert("c", 3), (None, Some("a")));
    }
}
