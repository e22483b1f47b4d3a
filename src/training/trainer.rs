use std::{sync::Arc, thread};

use log::{Level, debug, info, log_enabled};

use super::{
    FeatureGraph, FixedWeightRules, PosNegExample, Regularizer, Result, SrwModel, StatusLogger,
    TrainErr,
};
use crate::{
    initialization::{ConstParamGen, ParamGen},
    optimization::{LearningRate, OptimizerState, StepReport},
    storage::{FeatureStore, ParameterStore},
};

/// How often, in seconds, a worker may log which example it is training on.
pub const DEFAULT_STATUS_INTERVAL_SECS: u64 = 2;

/// Trains the feature weights of a random walk model one example at a time.
///
/// A `Trainer` is meant to be used by a single worker. Other workers get their own
/// through `duplicate`, which shares the model, the rules and the squared gradient
/// totals while copying the optimizer configuration.
pub struct Trainer<M, R, L: LearningRate> {
    model: Arc<M>,
    regularizer: Arc<R>,
    optimizer: OptimizerState<L>,
    fixed_weights: Arc<FixedWeightRules>,
    param_gen: Arc<dyn ParamGen>,
    status_interval_secs: u64,
}

impl<M, R, L: LearningRate + Clone> Clone for Trainer<M, R, L> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            regularizer: Arc::clone(&self.regularizer),
            optimizer: self.optimizer.duplicate(),
            fixed_weights: Arc::clone(&self.fixed_weights),
            param_gen: Arc::clone(&self.param_gen),
            status_interval_secs: self.status_interval_secs,
        }
    }
}

impl<M, R, L: LearningRate> Trainer<M, R, L> {
    /// Creates a new `Trainer` where every feature is trainable and new features
    /// start with the default weight.
    ///
    /// # Arguments
    /// * `model` - The model computing gradients.
    /// * `regularizer` - Prepares the parameters before each example.
    /// * `optimizer` - The optimizer state, holding the squared gradient totals.
    ///
    /// # Returns
    /// A new `Trainer` instance.
    pub fn new(model: M, regularizer: R, optimizer: OptimizerState<L>) -> Self {
        Self {
            model: Arc::new(model),
            regularizer: Arc::new(regularizer),
            optimizer,
            fixed_weights: Arc::new(FixedWeightRules::default()),
            param_gen: Arc::new(ConstParamGen::default()),
            status_interval_secs: DEFAULT_STATUS_INTERVAL_SECS,
        }
    }

    pub fn with_fixed_weights(mut self, rules: FixedWeightRules) -> Self {
        self.fixed_weights = Arc::new(rules);
        self
    }

    pub fn with_param_gen(mut self, param_gen: Arc<dyn ParamGen>) -> Self {
        self.param_gen = param_gen;
        self
    }

    pub fn with_status_interval(mut self, secs: u64) -> Self {
        self.status_interval_secs = secs;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn optimizer(&self) -> &OptimizerState<L> {
        &self.optimizer
    }

    pub fn optimizer_mut(&mut self) -> &mut OptimizerState<L> {
        &mut self.optimizer
    }

    /// Whether `feature` may be updated, i.e. it matches no fixed weight rule.
    pub fn trainable(&self, feature: &str) -> bool {
        !self.fixed_weights.is_fixed(feature)
    }

    /// Gives every feature of `graph` missing from `params` its initial weight.
    ///
    /// # Returns
    /// The amount of features initialized.
    pub fn initialize_features<G: FeatureGraph>(&self, params: &ParameterStore, graph: &G) -> usize {
        graph
            .feature_names()
            .filter(|f| !params.contains(f) && params.init_if_absent(f, self.param_gen.sample(f)))
            .count()
    }
}

impl<M, R, L: LearningRate + Clone> Trainer<M, R, L> {
    /// Creates a trainer for another worker.
    ///
    /// # Returns
    /// A new `Trainer` sharing the model, the regularizer, the rules, the initial
    /// weight generator and the squared gradient totals with `self`.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl<M, R, L> Trainer<M, R, L>
where
    R: Regularizer,
    L: LearningRate,
{
    /// Takes a gradient step along the direction suggested by `example`.
    ///
    /// # Arguments
    /// * `params` - The weights to train, shared with other workers.
    /// * `example` - The example to train on.
    /// * `status` - Rate limits the progress log lines.
    ///
    /// # Returns
    /// What the step did, or a `TrainErr::UnknownFeature` if the gradient references
    /// a feature the example's graph can't resolve. Nothing is updated in that case.
    pub fn train_on_example<E>(
        &self,
        params: &ParameterStore,
        example: &E,
        status: &StatusLogger,
    ) -> Result<StepReport>
    where
        E: PosNegExample,
        M: SrwModel<E>,
    {
        if log_enabled!(Level::Debug) {
            debug!("training on {example}");
        } else if log_enabled!(Level::Info) && status.due(self.status_interval_secs) {
            info!("{:?} training on {example}", thread::current().id());
        }

        let (gradient, underflow) = self.example_gradient(params, example, status)?;
        let mut report = self
            .optimizer
            .apply(params, gradient, |feature| self.trainable(feature));
        report.underflow += underflow;

        Ok(report)
    }

    /// Computes the gradient of `example` and adds it into `out` without stepping.
    ///
    /// # Arguments
    /// * `params` - The weights the gradient is computed at.
    /// * `example` - The example to compute the gradient of.
    /// * `status` - Handed over to the model's inference.
    /// * `out` - Where the named gradient is accumulated.
    ///
    /// # Returns
    /// The amount of gradient entries accumulated, or a `TrainErr::UnknownFeature`.
    /// Entries below the optimizer's `min_gradient` are not accumulated.
    pub fn accumulate_gradient<E, P>(
        &self,
        params: &ParameterStore,
        example: &E,
        status: &StatusLogger,
        out: &P,
    ) -> Result<usize>
    where
        E: PosNegExample,
        M: SrwModel<E>,
        P: FeatureStore + ?Sized,
    {
        let (gradient, _) = self.example_gradient(params, example, status)?;
        let len = gradient.len();

        for (feature, grad) in gradient {
            out.adjust(feature, grad);
        }

        Ok(len)
    }

    /// Runs the model on `example` and resolves the gradient's feature ids to names.
    ///
    /// Underflowing entries are dropped before their ids are looked up, so they can't
    /// fail the example.
    ///
    /// # Returns
    /// The named gradient and the amount of entries dropped for underflowing.
    fn example_gradient<'e, E>(
        &self,
        params: &ParameterStore,
        example: &'e E,
        status: &StatusLogger,
    ) -> Result<(Vec<(&'e str, f64)>, usize)>
    where
        E: PosNegExample,
        M: SrwModel<E>,
    {
        let graph = example.graph();

        self.initialize_features(params, graph);
        self.regularizer.prepare_for_example(params, graph);

        let mut workspace = self.model.load(params, example);
        self.model.inference(params, example, &mut workspace, status);
        let gradient = self.model.gradient(params, example, &workspace);

        let min_gradient = self.optimizer.config().min_gradient;
        let total = gradient.len();

        let named = gradient
            .into_iter()
            .filter(|(_, grad)| grad.abs() >= min_gradient)
            .map(|(id, grad)| match graph.feature_symbol(id) {
                Some(feature) => Ok((feature, grad)),
                None => Err(TrainErr::UnknownFeature {
                    id,
                    example: example.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        let underflow = total - named.len();
        Ok((named, underflow))
    }
}
