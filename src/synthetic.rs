//! A small stand-in for a real random walk model, used by the demo binary and the
//! integration tests.
//!
//! Each example activates a few features; its score is the weighted sum of the
//! activations and the loss is the logistic loss of that score against the label.

use std::{collections::HashMap, fmt};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    storage::{FeatureStore, ParameterStore},
    training::{FeatureGraph, PosNegExample, SrwModel, StatusLogger},
};

/// The feature names of a single example, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct FeatureLibrary {
    symbols: Vec<String>,
    ids: HashMap<String, usize>,
}

impl FeatureLibrary {
    /// Returns the id of `feature`, registering it if needed.
    pub fn intern(&mut self, feature: &str) -> usize {
        if let Some(&id) = self.ids.get(feature) {
            return id;
        }

        let id = self.symbols.len();
        self.symbols.push(feature.to_owned());
        self.ids.insert(feature.to_owned(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FeatureGraph for FeatureLibrary {
    fn feature_symbol(&self, id: usize) -> Option<&str> {
        self.symbols.get(id).map(String::as_str)
    }

    fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

/// An example with feature activations and a positive or negative label.
#[derive(Debug, Clone)]
pub struct LabeledExample {
    name: String,
    library: FeatureLibrary,
    activations: Vec<(usize, f64)>,
    positive: bool,
}

impl LabeledExample {
    /// Creates a new `LabeledExample`.
    ///
    /// # Arguments
    /// * `name` - Shown in log lines.
    /// * `activations` - Pairs of feature name and activation.
    /// * `positive` - The label.
    pub fn new<S: AsRef<str>>(name: &str, activations: &[(S, f64)], positive: bool) -> Self {
        let mut library = FeatureLibrary::default();
        let activations = activations
            .iter()
            .map(|(feature, x)| (library.intern(feature.as_ref()), *x))
            .collect();

        Self {
            name: name.to_owned(),
            library,
            activations,
            positive,
        }
    }

    pub fn positive(&self) -> bool {
        self.positive
    }
}

impl fmt::Display for LabeledExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.positive { '+' } else { '-' };
        write!(f, "{}{sign}", self.name)
    }
}

impl PosNegExample for LabeledExample {
    type Graph = FeatureLibrary;

    fn graph(&self) -> &FeatureLibrary {
        &self.library
    }
}

/// Logistic scoring of the activated features.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticSrw;

/// The intermediate state of `LogisticSrw` for one example.
#[derive(Debug, Default)]
pub struct Walk {
    score: f64,
    prob: f64,
}

impl LogisticSrw {
    /// The probability the model gives to `example` being positive.
    pub fn predict(&self, params: &ParameterStore, example: &LabeledExample) -> f64 {
        sigmoid(score(params, example))
    }
}

impl SrwModel<LabeledExample> for LogisticSrw {
    type Workspace = Walk;

    fn load(&self, params: &ParameterStore, example: &LabeledExample) -> Walk {
        Walk {
            score: score(params, example),
            prob: 0.,
        }
    }

    fn inference(
        &self,
        _params: &ParameterStore,
        _example: &LabeledExample,
        walk: &mut Walk,
        _status: &StatusLogger,
    ) {
        walk.prob = sigmoid(walk.score);
    }

    fn gradient(
        &self,
        _params: &ParameterStore,
        example: &LabeledExample,
        walk: &Walk,
    ) -> HashMap<usize, f64> {
        let target = if example.positive { 1. } else { 0. };
        let err = walk.prob - target;

        example
            .activations
            .iter()
            .map(|&(id, x)| (id, err * x))
            .collect()
    }
}

fn score(params: &ParameterStore, example: &LabeledExample) -> f64 {
    example
        .activations
        .iter()
        .map(|&(id, x)| {
            let feature = example.library.feature_symbol(id).unwrap_or_default();
            params.get(feature).unwrap_or(0.) * x
        })
        .sum()
}

fn sigmoid(x: f64) -> f64 {
    1. / (1. + (-x).exp())
}

/// Generates a linearly separable data set over `features` named features.
///
/// Features with an even index push examples towards the positive label, odd ones
/// towards the negative label. A `bias` feature is active in every example.
pub fn separable_examples(features: usize, examples: usize, seed: u64) -> Vec<LabeledExample> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..examples)
        .map(|i| {
            let mut activations = vec![("bias".to_string(), 1.)];
            let mut margin = 0.;

            for f in 0..features {
                if rng.random_bool(0.5) {
                    let x: f64 = rng.random_range(0.5..1.5);
                    margin += if f % 2 == 0 { x } else { -x };
                    activations.push((format!("f{f}"), x));
                }
            }

            LabeledExample::new(&format!("ex{i}"), &activations, margin >= 0.)
        })
        .collect()
}
