use std::{collections::HashMap, fmt::Display};

use super::StatusLogger;
use crate::storage::ParameterStore;

/// The graph of a training example, as far as weight training is concerned: a
/// lookup between the feature ids used in gradients and their names.
pub trait FeatureGraph {
    /// Resolves a feature id to its name.
    fn feature_symbol(&self, id: usize) -> Option<&str>;

    /// The names of every feature labelling an edge of this graph.
    fn feature_names(&self) -> impl Iterator<Item = &str>;
}

/// A training example: a graph plus a labelling of its goal nodes as positive or
/// negative.
pub trait PosNegExample: Display {
    type Graph: FeatureGraph;

    fn graph(&self) -> &Self::Graph;
}

/// Prepares the parameters for an example before its gradient is computed.
pub trait Regularizer: Send + Sync {
    fn prepare_for_example<G: FeatureGraph>(&self, params: &ParameterStore, graph: &G);
}

/// A regularizer that leaves the parameters untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegularizer;

impl Regularizer for NoRegularizer {
    fn prepare_for_example<G: FeatureGraph>(&self, _params: &ParameterStore, _graph: &G) {}
}

/// The random walk model computing the loss gradient of an example.
///
/// The per example intermediate state lives in `Workspace`, which forces the
/// `load`, `inference`, `gradient` order at the type level.
pub trait SrwModel<E: PosNegExample>: Send + Sync {
    type Workspace;

    /// Initializes the example's parameters, e.g. the transition matrix and its derivative.
    fn load(&self, params: &ParameterStore, example: &E) -> Self::Workspace;

    /// Runs the walk, e.g. computes the node probabilities and their derivative.
    fn inference(
        &self,
        params: &ParameterStore,
        example: &E,
        workspace: &mut Self::Workspace,
        status: &StatusLogger,
    );

    /// Computes the empirical loss gradient, keyed by feature id.
    fn gradient(
        &self,
        params: &ParameterStore,
        example: &E,
        workspace: &Self::Workspace,
    ) -> HashMap<usize, f64>;
}
