use std::collections::HashMap;
use std::hash::Hash;

/// Run-scoped memo cache. A fighter referenced by many bouts is fetched
/// and derived once; entries live until the run ends, no eviction.
#[derive(Debug, Default)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Eq + Hash, V: Clone> MemoCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for `key`, invoking `compute` at most
    /// once per distinct key for the lifetime of the cache.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        self.entries.entry(key).or_insert_with(compute).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_runs_once_per_key() {
        let mut cache: MemoCache<String, u32> = MemoCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            let value = cache.get_or_compute("alice".to_string(), || {
                calls += 1;
                7
            });
            assert_eq!(value, 7);
        }
        assert_eq!(calls, 1);

        cache.get_or_compute("bea".to_string(), || {
            calls += 1;
            9
        });
        assert_eq!(calls, 2);
        assert_eq!(cache.len(), 2);
    }
}
