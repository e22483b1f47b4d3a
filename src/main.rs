use std::{env, num::NonZeroUsize};

use adagrad_srw::{
    config::TrainerConfig,
    optimization::OptimizerState,
    storage::{FeatureStore, ParameterStore, SquaredGradients},
    synthetic::{self, LogisticSrw},
    training::{NoRegularizer, StatusLogger, Trainer, train_parallel},
};
use anyhow::Context;
use log::info;

const FEATURES: usize = 8;
const EXAMPLES: usize = 400;
const EPOCHS: usize = 5;
const SEED: u64 = 42;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            TrainerConfig::load(&path).with_context(|| format!("loading config from {path}"))?
        }
        None => TrainerConfig::default(),
    };
    info!("training with {config:?}");

    let params = ParameterStore::new(config.shards);
    let totals = SquaredGradients::new(config.shards);
    let optimizer = OptimizerState::new(config.optimizer_config(), config.policy.build(), totals);

    let trainer = Trainer::new(LogisticSrw, NoRegularizer, optimizer)
        .with_fixed_weights(config.fixed_weight_rules())
        .with_param_gen(config.init.build()?)
        .with_status_interval(config.status_interval_secs);

    let examples = synthetic::separable_examples(FEATURES, EXAMPLES, SEED);
    let workers: NonZeroUsize = config.workers();
    let status = StatusLogger::new();

    for epoch in 0..EPOCHS {
        let report = train_parallel(&trainer, &params, &examples, workers, &status)?;

        let correct = examples
            .iter()
            .filter(|ex| (trainer.model().predict(&params, ex) >= 0.5) == ex.positive())
            .count();
        let accuracy = correct as f64 / examples.len() as f64;

        info!(
            epoch = epoch,
            updated = report.updated,
            underflow = report.underflow,
            frozen = report.frozen,
            accuracy = accuracy;
            "epoch done"
        );
    }

    let totals = trainer.optimizer().accumulator().snapshot();
    for (feature, weight) in params.snapshot() {
        let total = totals.get(&feature).copied().unwrap_or(0.);
        info!("{feature}: weight={weight:.4} squared_gradients={total:.4}");
    }

    Ok(())
}
