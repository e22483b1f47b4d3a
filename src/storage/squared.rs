use std::{collections::BTreeMap, num::NonZeroUsize};

use super::{FeatureStore, Result, ShardedMap, StorageErr};

/// The running total of squared gradients observed for each feature.
///
/// Totals can only grow: the sole mutation is adding the square of a gradient. A
/// missing feature means it was never observed, which is not the same as a zero total.
///
/// Clones alias the same totals. This is how worker-local optimizer handles share
/// their adaptive rates without any extra synchronization.
#[derive(Debug, Clone, Default)]
pub struct SquaredGradients(ShardedMap);

impl SquaredGradients {
    /// Creates a new empty `SquaredGradients` accumulator.
    ///
    /// # Arguments
    /// * `shards` - The amount of independently locked partitions.
    pub fn new(shards: NonZeroUsize) -> Self {
        Self(ShardedMap::new(shards))
    }

    /// Restores an accumulator from previously taken totals.
    ///
    /// # Arguments
    /// * `shards` - The amount of independently locked partitions.
    /// * `totals` - The totals to restore.
    ///
    /// # Returns
    /// A `StorageErr` if any of the totals is negative or NaN.
    pub fn from_snapshot<I, S>(shards: NonZeroUsize, totals: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let map = ShardedMap::new(shards);

        for (feature, total) in totals {
            let feature = feature.as_ref();

            if total.is_nan() {
                return Err(StorageErr::NanTotal {
                    feature: feature.to_owned(),
                });
            }

            if total < 0. {
                return Err(StorageErr::NegativeTotal {
                    feature: feature.to_owned(),
                    value: total,
                });
            }

            map.set(feature, total);
        }

        Ok(Self(map))
    }

    /// Adds the square of `grad` to the total of `feature`.
    ///
    /// # Arguments
    /// * `feature` - The feature name.
    /// * `grad` - The gradient observed for `feature`.
    ///
    /// # Returns
    /// The total after the addition.
    pub fn add_square(&self, feature: &str, grad: f64) -> f64 {
        self.0.adjust(feature, grad * grad)
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0.get(feature)
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.0.snapshot()
    }

    /// Whether `self` and `other` are handles to the very same totals.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Creates an independent copy of the totals.
    pub fn deep_copy(&self) -> Self {
        Self(self.0.deep_copy())
    }
}
