/// A `ParamGen` generates the initial weight of features seen for the first time.
///
/// Generators are shared by every worker of a training run, hence `&self`.
pub trait ParamGen: Send + Sync {
    /// Should sample the initial weight of a single feature.
    ///
    /// # Arguments
    /// * `feature` - The name of the feature being initialized.
    fn sample(&self, feature: &str) -> f64;
}
