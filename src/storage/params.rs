use std::{collections::BTreeMap, num::NonZeroUsize};

use super::{FeatureStore, ShardedMap};

/// The feature weights of the model, keyed by feature name.
///
/// Weights are created lazily on their first write and are never removed during a run.
/// Clones share the same weights, so one store can be handed to every worker.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore(ShardedMap);

impl ParameterStore {
    /// Creates a new empty `ParameterStore`.
    ///
    /// # Arguments
    /// * `shards` - The amount of independently locked partitions.
    pub fn new(shards: NonZeroUsize) -> Self {
        Self(ShardedMap::new(shards))
    }

    /// Creates a `ParameterStore` holding the given weights.
    pub fn from_weights<I, S>(shards: NonZeroUsize, weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let store = Self::new(shards);
        for (feature, weight) in weights {
            store.set(feature.as_ref(), weight);
        }

        store
    }

    /// Returns the weight of `feature` or `default` if it was never written.
    pub fn get_or(&self, feature: &str, default: f64) -> f64 {
        self.get(feature).unwrap_or(default)
    }

    /// Stores `value` for `feature` only if it has no weight yet.
    ///
    /// # Returns
    /// Whether the value was inserted.
    pub fn init_if_absent(&self, feature: &str, value: f64) -> bool {
        self.0.init_if_absent(feature, value)
    }

    /// Creates an independent copy of the weights, useful for checkpoints.
    pub fn deep_copy(&self) -> Self {
        Self(self.0.deep_copy())
    }
}

impl FeatureStore for ParameterStore {
    fn get(&self, feature: &str) -> Option<f64> {
        self.0.get(feature)
    }

    fn contains(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    fn adjust(&self, feature: &str, delta: f64) -> f64 {
        self.0.adjust(feature, delta)
    }

    fn set(&self, feature: &str, value: f64) {
        self.0.set(feature, value);
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn snapshot(&self) -> BTreeMap<String, f64> {
        self.0.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARDS: NonZeroUsize = NonZeroUsize::new(4).unwrap();

    #[test]
    fn test_from_weights() {
        let store = ParameterStore::from_weights(SHARDS, [("a", 1.0), ("b", -2.0)]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), Some(1.0));
        assert_eq!(store.get_or("b", 0.0), -2.0);
        assert_eq!(store.get_or("c", 0.5), 0.5);
    }

    #[test]
    fn test_init_if_absent_keeps_existing_weight() {
        let store = ParameterStore::new(SHARDS);
        store.set("a", 3.0);

        assert!(!store.init_if_absent("a", 1.0));
        assert!(store.init_if_absent("b", 1.0));
        assert_eq!(store.get("a"), Some(3.0));
        assert_eq!(store.get("b"), Some(1.0));
    }

    #[test]
    fn test_deep_copy_detaches_from_training() {
        let store = ParameterStore::from_weights(SHARDS, [("a", 1.0)]);
        let checkpoint = store.deep_copy();

        store.adjust("a", 1.0);
        assert_eq!(checkpoint.get("a"), Some(1.0));
        assert_eq!(store.get("a"), Some(2.0));
    }
}
