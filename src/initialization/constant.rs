use super::ParamGen;

/// The weight new features start with when nothing else is configured.
///
/// A weight of one keeps a single feature edge neutral for the walk's scoring.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A parameter generator that always generates the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstParamGen {
    value: f64,
}

impl ConstParamGen {
    /// Creates a new `ConstParamGen` parameter generator.
    ///
    /// # Arguments
    /// * `value` - The value to always generate.
    ///
    /// # Returns
    /// A new `ConstParamGen` instance.
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Default for ConstParamGen {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHT)
    }
}

impl ParamGen for ConstParamGen {
    fn sample(&self, _feature: &str) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant() {
        let param_gen = ConstParamGen::new(0.25);
        assert_eq!(param_gen.sample("a"), 0.25);
        assert_eq!(param_gen.sample("b"), 0.25);
    }

    #[test]
    fn default_is_neutral() {
        assert_eq!(ConstParamGen::default().sample("a"), DEFAULT_WEIGHT);
    }
}
