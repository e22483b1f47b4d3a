use std::sync::Arc;

use crate::storage::SquaredGradients;

/// Defines the step size taken for a feature given its squared gradient history.
///
/// Policies are stateless strategies, the base rate and the totals are owned by
/// the `OptimizerState` calling them.
pub trait LearningRate: Send + Sync {
    /// Computes the effective learning rate for `feature`.
    ///
    /// # Arguments
    /// * `eta` - The configured base learning rate.
    /// * `feature` - The feature about to be updated.
    /// * `totals` - The squared gradient totals, already holding the current step.
    fn rate(&self, eta: f64, feature: &str, totals: &SquaredGradients) -> f64;
}

impl<L: LearningRate + ?Sized> LearningRate for Arc<L> {
    fn rate(&self, eta: f64, feature: &str, totals: &SquaredGradients) -> f64 {
        (**self).rate(eta, feature, totals)
    }
}

/// AdaGrad: the base rate scaled by the inverse square root of the feature's total.
///
/// A feature that was never observed has a rate of zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaGrad;

impl LearningRate for AdaGrad {
    fn rate(&self, eta: f64, feature: &str, totals: &SquaredGradients) -> f64 {
        match totals.get(feature) {
            Some(total) => eta / total.sqrt(),
            None => 0.,
        }
    }
}

/// Plain stochastic gradient descent, every feature moves with the base rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRate;

impl LearningRate for FixedRate {
    fn rate(&self, eta: f64, _feature: &str, _totals: &SquaredGradients) -> f64 {
        eta
    }
}
