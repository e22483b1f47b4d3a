use std::{
    collections::{BTreeMap, HashMap},
    hash::{DefaultHasher, Hash, Hasher},
    num::NonZeroUsize,
    sync::Arc,
};

use parking_lot::Mutex;
use rayon::prelude::*;

use super::FeatureStore;

/// The amount of shards used when none is specified.
pub const DEFAULT_SHARDS: usize = 16;

/// A feature map partitioned in shards, each one behind its own lock.
///
/// A key always hashes to the same shard, so adjusting a single feature only ever
/// takes one lock and workers touching unrelated features rarely contend.
///
/// Cloning a `ShardedMap` is cheap and aliases the same shards, writes through one
/// clone are visible through every other. Use `deep_copy` for an independent map.
#[derive(Debug)]
pub struct ShardedMap {
    shards: Arc<[Mutex<HashMap<String, f64>>]>,
}

impl Clone for ShardedMap {
    fn clone(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
        }
    }
}

impl Default for ShardedMap {
    fn default() -> Self {
        // SAFETY: `DEFAULT_SHARDS` is a non zero constant.
        Self::new(NonZeroUsize::new(DEFAULT_SHARDS).unwrap())
    }
}

impl ShardedMap {
    /// Creates a new empty `ShardedMap`.
    ///
    /// # Arguments
    /// * `shards` - The amount of independently locked partitions.
    ///
    /// # Returns
    /// A new `ShardedMap` instance.
    pub fn new(shards: NonZeroUsize) -> Self {
        let shards: Vec<_> = (0..shards.get())
            .map(|_| Mutex::new(HashMap::new()))
            .collect();

        Self {
            shards: Arc::from(shards),
        }
    }

    /// Returns the amount of partitions of this map.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Whether `self` and `other` alias the same underlying shards.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shards, &other.shards)
    }

    /// Creates an independent copy of this map with the same amount of shards.
    ///
    /// # Returns
    /// A new `ShardedMap` that shares nothing with `self`.
    pub fn deep_copy(&self) -> Self {
        let shards: Vec<_> = self
            .shards
            .iter()
            .map(|shard| Mutex::new(shard.lock().clone()))
            .collect();

        Self {
            shards: Arc::from(shards),
        }
    }

    /// Stores `value` for `feature` only if the feature is absent, atomically.
    ///
    /// # Returns
    /// Whether the value was inserted.
    pub fn init_if_absent(&self, feature: &str, value: f64) -> bool {
        let mut shard = self.shard(feature).lock();
        if shard.contains_key(feature) {
            return false;
        }

        shard.insert(feature.to_owned(), value);
        true
    }

    fn shard(&self, feature: &str) -> &Mutex<HashMap<String, f64>> {
        let mut hasher = DefaultHasher::new();
        feature.hash(&mut hasher);
        let idx = hasher.finish() as usize % self.shards.len();
        &self.shards[idx]
    }
}

impl FeatureStore for ShardedMap {
    fn get(&self, feature: &str) -> Option<f64> {
        self.shard(feature).lock().get(feature).copied()
    }

    fn contains(&self, feature: &str) -> bool {
        self.shard(feature).lock().contains_key(feature)
    }

    fn adjust(&self, feature: &str, delta: f64) -> f64 {
        let mut shard = self.shard(feature).lock();

        match shard.get_mut(feature) {
            Some(value) => {
                *value += delta;
                *value
            }
            None => {
                shard.insert(feature.to_owned(), delta);
                delta
            }
        }
    }

    fn set(&self, feature: &str, value: f64) {
        self.shard(feature).lock().insert(feature.to_owned(), value);
    }

    fn len(&self) -> usize {
        self.shards.par_iter().map(|shard| shard.lock().len()).sum()
    }

    fn snapshot(&self) -> BTreeMap<String, f64> {
        self.shards
            .par_iter()
            .map(|shard| {
                shard
                    .lock()
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect::<Vec<_>>()
            })
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn create_test_map(shards: usize) -> ShardedMap {
        ShardedMap::new(NonZeroUsize::new(shards).unwrap())
    }

    #[test]
    fn test_adjust_initializes_absent_feature() {
        let map = create_test_map(4);

        assert!(!map.contains("a"));
        assert_eq!(map.get("a"), None);

        assert_eq!(map.adjust("a", -2.5), -2.5);
        assert!(map.contains("a"));
        assert_eq!(map.get("a"), Some(-2.5));

        assert_eq!(map.adjust("a", 1.0), -1.5);
        assert_eq!(map.get("a"), Some(-1.5));
    }

    #[test]
    fn test_zero_is_not_absence() {
        let map = create_test_map(2);
        map.set("z", 0.0);

        assert!(map.contains("z"));
        assert_eq!(map.get("z"), Some(0.0));
        assert!(!map.contains("y"));
    }

    #[test]
    fn test_clone_aliases_shards() {
        let map = create_test_map(3);
        let alias = map.clone();

        alias.adjust("f", 2.0);
        assert_eq!(map.get("f"), Some(2.0));
        assert!(map.ptr_eq(&alias));
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let map = create_test_map(3);
        map.set("f", 1.0);

        let copy = map.deep_copy();
        copy.adjust("f", 1.0);
        copy.set("g", 5.0);

        assert_eq!(map.get("f"), Some(1.0));
        assert!(!map.contains("g"));
        assert_eq!(copy.get("f"), Some(2.0));
        assert_eq!(copy.shard_count(), 3);
        assert!(!map.ptr_eq(&copy));
    }

    #[test]
    fn test_len_and_snapshot_span_all_shards() {
        const FEATURES: usize = 100;

        let map = create_test_map(7);
        for i in 0..FEATURES {
            map.set(&format!("f{i}"), i as f64);
        }

        assert_eq!(map.len(), FEATURES);
        assert!(!map.is_empty());

        let snapshot = map.snapshot();
        assert_eq!(snapshot.len(), FEATURES);
        assert_eq!(snapshot["f42"], 42.0);
    }

    #[test]
    fn test_concurrent_adjust_loses_no_updates() {
        const THREADS: usize = 8;
        const ADJUSTS: usize = 1000;

        let map = create_test_map(4);

        thread::scope(|s| {
            for _ in 0..THREADS {
                let map = map.clone();
                s.spawn(move || {
                    for _ in 0..ADJUSTS {
                        map.adjust("hot", 1.0);
                    }
                });
            }
        });

        assert_eq!(map.get("hot"), Some((THREADS * ADJUSTS) as f64));
    }
}
