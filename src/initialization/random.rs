use parking_lot::Mutex;
use rand::{
    SeedableRng,
    distr::{Distribution, Uniform},
    rngs::StdRng,
};

use super::{ParamGen, Result};

/// A parameter generator that draws initial weights uniformly from a range.
#[derive(Debug)]
pub struct RandParamGen {
    rng: Mutex<StdRng>,
    distribution: Uniform<f64>,
}

impl RandParamGen {
    /// Creates a new `RandParamGen` parameter generator with a uniform distribution.
    ///
    /// # Arguments
    /// * `seed` - An optional seed, the generator is seeded from the OS otherwise.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit.
    ///
    /// # Returns
    /// An error if the range is invalid (low >= high or non finite limits).
    pub fn uniform(seed: Option<u64>, low: f64, high: f64) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            rng: Mutex::new(rng),
            distribution: Uniform::new(low, high)?,
        })
    }
}

impl ParamGen for RandParamGen {
    fn sample(&self, _feature: &str) -> f64 {
        let mut rng = self.rng.lock();
        self.distribution.sample(&mut *rng)
    }
}
