use std::num::NonZeroUsize;

use log::info;
use rayon::{ThreadPoolBuilder, prelude::*};

use super::{PosNegExample, Regularizer, Result, SrwModel, StatusLogger, Trainer};
use crate::{
    optimization::{LearningRate, StepReport},
    storage::ParameterStore,
};

/// Trains on every example once using a pool of `workers` threads.
///
/// Each worker trains with its own duplicate of `trainer`. The parameters and the
/// squared gradient totals are shared by all of them without any global lock, so
/// concurrent steps on the same feature may interleave: a worker can compute its
/// rate from totals that already include another worker's gradient.
///
/// # Arguments
/// * `trainer` - The trainer to duplicate for every worker.
/// * `params` - The weights to train.
/// * `examples` - The examples to train on, in no particular order.
/// * `workers` - The amount of worker threads.
/// * `status` - Rate limits the progress log lines of every worker.
///
/// # Returns
/// The sum of every step's report, or the first error a worker ran into.
pub fn train_parallel<M, R, L, E>(
    trainer: &Trainer<M, R, L>,
    params: &ParameterStore,
    examples: &[E],
    workers: NonZeroUsize,
    status: &StatusLogger,
) -> Result<StepReport>
where
    M: SrwModel<E>,
    R: Regularizer,
    L: LearningRate + Clone,
    E: PosNegExample + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.get())
        .thread_name(|i| format!("srw-worker-{i}"))
        .build()?;

    let report = pool.install(|| {
        examples
            .par_iter()
            .map_init(
                || trainer.duplicate(),
                |worker, example| worker.train_on_example(params, example, status),
            )
            .try_reduce(StepReport::default, |a, b| Ok(a + b))
    })?;

    info!(
        examples = examples.len(),
        updated = report.updated,
        overflowed = report.overflowed;
        "epoch finished"
    );

    Ok(report)
}
