use super::{LearningRate, StepReport, stepper, stepper::MIN_GRADIENT};
use crate::storage::{FeatureStore, SquaredGradients};

/// The base learning rate used when none is specified.
pub const DEFAULT_ETA: f64 = 1.0;

/// Scalar configuration of an optimizer, always copied by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    /// The base learning rate.
    pub eta: f64,
    /// Gradients with a smaller magnitude are skipped entirely.
    pub min_gradient: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            eta: DEFAULT_ETA,
            min_gradient: MIN_GRADIENT,
        }
    }
}

/// The state a worker needs to take gradient steps: its configuration, its
/// learning rate policy and a handle to the squared gradient totals.
///
/// The totals are shared: every handle obtained through `duplicate` (or `clone`)
/// reads and writes the very same totals, while the configuration of each handle
/// is its own. This is what lets many workers train concurrently and still adapt
/// their rates to each other's history.
#[derive(Debug, Clone)]
pub struct OptimizerState<L: LearningRate> {
    config: OptimizerConfig,
    policy: L,
    totals: SquaredGradients,
}

impl<L: LearningRate> OptimizerState<L> {
    /// Creates a new `OptimizerState`.
    ///
    /// # Arguments
    /// * `config` - The scalar configuration.
    /// * `policy` - The learning rate policy.
    /// * `totals` - The squared gradient totals, possibly shared or pre populated.
    ///
    /// # Returns
    /// A new `OptimizerState` instance.
    pub fn new(config: OptimizerConfig, policy: L, totals: SquaredGradients) -> Self {
        Self {
            config,
            policy,
            totals,
        }
    }

    /// Returns the scalar configuration of this handle.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Changes the base learning rate of this handle only.
    pub fn set_eta(&mut self, eta: f64) {
        self.config.eta = eta;
    }

    /// Changes the underflow threshold of this handle only.
    pub fn set_min_gradient(&mut self, min_gradient: f64) {
        self.config.min_gradient = min_gradient;
    }

    /// Returns the learning rate policy of this handle.
    pub fn policy(&self) -> &L {
        &self.policy
    }

    /// Returns the handle to the squared gradient totals.
    pub fn accumulator(&self) -> &SquaredGradients {
        &self.totals
    }

    /// Replaces the squared gradient totals, e.g. with restored or merged ones.
    ///
    /// Handles duplicated earlier keep pointing at the previous totals.
    pub fn set_accumulator(&mut self, totals: SquaredGradients) {
        self.totals = totals;
    }

    /// Returns the current learning rate of `feature`.
    pub fn rate(&self, feature: &str) -> f64 {
        self.policy.rate(self.config.eta, feature, &self.totals)
    }

    /// Applies a named sparse gradient to `params`.
    ///
    /// # Arguments
    /// * `params` - The weights to update.
    /// * `gradient` - Pairs of feature name and gradient value.
    /// * `trainable` - Whether a feature may be updated at all.
    ///
    /// # Returns
    /// A `StepReport` describing what happened to every gradient entry.
    pub fn apply<P, G, S, T>(&self, params: &P, gradient: G, trainable: T) -> StepReport
    where
        P: FeatureStore + ?Sized,
        G: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
        T: Fn(&str) -> bool,
    {
        stepper::apply(
            &self.config,
            &self.policy,
            params,
            &self.totals,
            gradient,
            trainable,
        )
    }
}

impl<L: LearningRate + Clone> OptimizerState<L> {
    /// Creates a handle for another worker.
    ///
    /// # Returns
    /// A new handle with a copy of this configuration, sharing the same totals.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}
