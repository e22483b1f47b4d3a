use log::warn;

use super::{LearningRate, OptimizerConfig, StepReport};
use crate::storage::{FeatureStore, SquaredGradients};

/// The smallest gradient magnitude that is ever squared into the totals.
///
/// It is ten times the square root of the smallest positive subnormal `f64`, smaller
/// gradients would underflow once squared.
pub const MIN_GRADIENT: f64 = 2.2227587494850775e-161;

/// Applies a sparse gradient to the parameters, one feature at a time.
///
/// For each feature the squared gradient is added to `totals` before the rate is
/// computed, so the step already accounts for its own gradient. The three mutations
/// (accumulate, rate, apply) are not atomic as a whole: concurrent workers may
/// interleave between them, only each single-key adjustment is atomic.
///
/// # Arguments
/// * `config` - The base rate and the underflow threshold.
/// * `policy` - The learning rate policy.
/// * `params` - The weights to update.
/// * `totals` - The squared gradient totals to update.
/// * `gradient` - Pairs of feature name and gradient value.
/// * `trainable` - Whether a feature may be updated at all.
///
/// # Returns
/// A `StepReport` describing what happened to every gradient entry.
pub fn apply<L, P, G, S, T>(
    config: &OptimizerConfig,
    policy: &L,
    params: &P,
    totals: &SquaredGradients,
    gradient: G,
    trainable: T,
) -> StepReport
where
    L: LearningRate + ?Sized,
    P: FeatureStore + ?Sized,
    G: IntoIterator<Item = (S, f64)>,
    S: AsRef<str>,
    T: Fn(&str) -> bool,
{
    let mut report = StepReport::default();

    for (feature, grad) in gradient {
        let feature = feature.as_ref();

        if grad.abs() < config.min_gradient {
            report.underflow += 1;
            continue;
        }

        if !trainable(feature) {
            report.frozen += 1;
            continue;
        }

        let total = totals.add_square(feature, grad);
        let rate = policy.rate(config.eta, feature, totals);
        let weight = params.adjust(feature, -rate * grad);
        report.updated += 1;

        if weight.is_infinite() {
            report.overflowed += 1;
            warn!(
                feature = feature,
                gradient = grad,
                total = total;
                "weight became infinite after gradient step"
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;
    use crate::{
        optimization::{AdaGrad, FixedRate},
        storage::ParameterStore,
    };

    const SHARDS: NonZeroUsize = NonZeroUsize::new(4).unwrap();
    const EPS: f64 = 1e-12;

    fn create_test_state() -> (ParameterStore, SquaredGradients) {
        (ParameterStore::new(SHARDS), SquaredGradients::new(SHARDS))
    }

    fn config(eta: f64) -> OptimizerConfig {
        OptimizerConfig {
            eta,
            ..Default::default()
        }
    }

    #[test]
    fn test_min_gradient_constant() {
        let expected = f64::from_bits(1).sqrt() * 10.;
        assert!(((MIN_GRADIENT - expected) / expected).abs() < 1e-12);
    }

    #[test]
    fn test_first_step_moves_by_eta_against_the_sign() {
        const ETA: f64 = 0.5;

        for g in [3.0, -0.25, 1e-100] {
            let (params, totals) = create_test_state();
            params.set("f", 2.0);

            let report = apply(&config(ETA), &AdaGrad, &params, &totals, [("f", g)], |_| true);

            assert_eq!(report.updated, 1);
            assert_eq!(totals.get("f"), Some(g * g));
            let w = params.get("f").unwrap();
            assert!((w - (2.0 - ETA * g.signum())).abs() < EPS, "g={g} w={w}");
        }
    }

    #[test]
    fn test_two_successive_steps() {
        let (params, totals) = create_test_state();
        params.set("f", 0.0);

        apply(&config(1.0), &AdaGrad, &params, &totals, [("f", 2.0)], |_| true);
        assert_eq!(totals.get("f"), Some(4.0));
        assert_eq!(params.get("f"), Some(-1.0));

        apply(&config(1.0), &AdaGrad, &params, &totals, [("f", -1.0)], |_| true);
        assert_eq!(totals.get("f"), Some(5.0));

        let expected = -1.0 + 1.0 / 5f64.sqrt();
        assert!((params.get("f").unwrap() - expected).abs() < EPS);
        assert!((params.get("f").unwrap() - -0.5528).abs() < 1e-4);
    }

    #[test]
    fn test_totals_are_the_sum_of_squares() {
        let grads = [0.5, -2.0, 1.5, 3.0, -0.1];
        let (params, totals) = create_test_state();

        let mut expected_weight = 0.;
        let mut expected_total = 0.;
        for g in grads {
            apply(&config(0.1), &AdaGrad, &params, &totals, [("f", g)], |_| true);
            expected_total += g * g;
            expected_weight -= 0.1 * g / expected_total.sqrt();
        }

        assert!((totals.get("f").unwrap() - expected_total).abs() < EPS);
        assert!((params.get("f").unwrap() - expected_weight).abs() < EPS);
    }

    #[test]
    fn test_absent_feature_is_initialized_to_delta() {
        let (params, totals) = create_test_state();

        apply(&config(1.0), &AdaGrad, &params, &totals, [("new", -4.0)], |_| true);
        assert_eq!(params.get("new"), Some(1.0));
    }

    #[test]
    fn test_underflowing_gradient_touches_nothing() {
        let (params, totals) = create_test_state();
        params.set("f", 1.0);

        let tiny = MIN_GRADIENT / 2.;
        let gradient = [("f", tiny), ("g", -tiny), ("h", 0.0)];
        let report = apply(&config(1.0), &AdaGrad, &params, &totals, gradient, |_| true);

        assert_eq!(report.underflow, 3);
        assert_eq!(report.updated, 0);
        assert!(totals.is_empty());
        assert_eq!(params.get("f"), Some(1.0));
        assert!(!params.contains("g"));
    }

    #[test]
    fn test_frozen_feature_touches_nothing() {
        let (params, totals) = create_test_state();
        params.set("fixed", 1.0);

        let gradient = [("fixed", 1e6), ("free", 1.0)];
        let report = apply(&config(1.0), &AdaGrad, &params, &totals, gradient, |f| {
            f != "fixed"
        });

        assert_eq!(report.frozen, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(params.get("fixed"), Some(1.0));
        assert!(!totals.contains("fixed"));
        assert_eq!(params.get("free"), Some(-1.0));
    }

    #[test]
    fn test_overflow_is_reported_and_kept() {
        let (params, totals) = create_test_state();
        params.set("f", f64::MAX);

        let report = apply(&config(1.0), &FixedRate, &params, &totals, [("f", -f64::MAX)], |_| {
            true
        });

        assert_eq!(report.overflowed, 1);
        assert_eq!(params.get("f"), Some(f64::INFINITY));
    }

    #[test]
    fn test_fixed_rate_still_accumulates() {
        let (params, totals) = create_test_state();

        apply(&config(0.5), &FixedRate, &params, &totals, [("f", 2.0)], |_| true);
        assert_eq!(totals.get("f"), Some(4.0));
        assert_eq!(params.get("f"), Some(-1.0));
    }

    #[test]
    fn test_features_are_independent() {
        let (params, totals) = create_test_state();
        let gradient = vec![("a".to_string(), 1.0), ("b".to_string(), -3.0)];

        let report = apply(&config(1.0), &AdaGrad, &params, &totals, gradient, |_| true);

        assert_eq!(report.seen(), 2);
        assert_eq!(params.get("a"), Some(-1.0));
        assert!((params.get("b").unwrap() - 1.0).abs() < EPS);
        assert_eq!(totals.get("b"), Some(9.0));
    }
}
