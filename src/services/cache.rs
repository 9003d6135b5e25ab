// src/services/cache.rs
//
// Bounded memoization cache for geocoding lookups. Keys are the exact
// query strings; results for the same input are idempotent, so
// last-writer-wins under interleaved completions. Eviction is
// least-recently-used, driven by a monotonic tick rather than a wall
// clock so tests can exercise it deterministically.

use std::collections::HashMap;
use std::sync::Mutex;

pub struct MemoCache<V> {
    inner: Mutex<CacheInner<V>>,
    capacity: usize,
}

struct CacheInner<V> {
    entries: HashMap<String, Entry<V>>,
    tick: u64,
}

struct Entry<V> {
    value: V,
    last_used: u64,
}

impl<V: Clone> MemoCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner.entries.get_mut(key)?;
        entry.last_used = tick;
        Some(entry.value.clone())
    }

    pub fn insert(&self, key: String, value: V) {
        let mut inner = self.inner.lock().unwrap();
        inner.tick += 1;
        let tick = inner.tick;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let stalest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());
            if let Some(stalest) = stalest {
                inner.entries.remove(&stalest);
            }
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                last_used: tick,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
