use std::collections::BTreeMap;

/// A sparse mapping from feature name to a real value.
///
/// Implementations must make `adjust` atomic for a single key: reading the current
/// value (or its absence), adding and storing happen as one indivisible unit.
/// Nothing is promised across keys or across consecutive calls.
pub trait FeatureStore {
    /// Returns the value stored for `feature`, if any.
    fn get(&self, feature: &str) -> Option<f64>;

    /// Whether `feature` has ever been written.
    fn contains(&self, feature: &str) -> bool;

    /// Adds `delta` to the value stored for `feature`.
    ///
    /// # Arguments
    /// * `feature` - The feature name.
    /// * `delta` - The amount to add, an absent feature is initialized to it.
    ///
    /// # Returns
    /// The value stored after the adjustment.
    fn adjust(&self, feature: &str, delta: f64) -> f64;

    /// Overwrites the value stored for `feature`.
    fn set(&self, feature: &str, value: f64);

    /// Returns the amount of features stored.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies every entry into an ordered map.
    ///
    /// Entries written concurrently with this call may or may not be included.
    fn snapshot(&self) -> BTreeMap<String, f64>;
}
