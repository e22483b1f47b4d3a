use std::{error::Error, fmt, fs, io, num::NonZeroUsize, path::Path, sync::Arc, thread};

use serde::Deserialize;

use crate::{
    initialization::{ConstParamGen, DEFAULT_WEIGHT, InitErr, ParamGen, RandParamGen},
    optimization::{AdaGrad, DEFAULT_ETA, FixedRate, LearningRate, MIN_GRADIENT, OptimizerConfig},
    storage::DEFAULT_SHARDS,
    training::{DEFAULT_STATUS_INTERVAL_SECS, FixedWeightRules},
};

/// The configuration module's result type.
pub type Result<T> = std::result::Result<T, ConfigErr>;

/// Failures loading or validating a `TrainerConfig`.
#[derive(Debug)]
pub enum ConfigErr {
    Io(io::Error),
    Json(serde_json::Error),
    Init(InitErr),
    Invalid(String),
}

impl fmt::Display for ConfigErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErr::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigErr::Json(e) => write!(f, "invalid config JSON: {e}"),
            ConfigErr::Init(e) => write!(f, "{e}"),
            ConfigErr::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl Error for ConfigErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigErr::Io(e) => Some(e),
            ConfigErr::Json(e) => Some(e),
            ConfigErr::Init(e) => Some(e),
            ConfigErr::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<InitErr> for ConfigErr {
    fn from(value: InitErr) -> Self {
        Self::Init(value)
    }
}

/// Which learning rate policy the optimizer uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySpec {
    #[default]
    AdaGrad,
    Fixed,
}

impl PolicySpec {
    pub fn build(self) -> Arc<dyn LearningRate> {
        match self {
            PolicySpec::AdaGrad => Arc::new(AdaGrad),
            PolicySpec::Fixed => Arc::new(FixedRate),
        }
    }
}

/// How features seen for the first time get their weight.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitSpec {
    Const(f64),
    Uniform {
        low: f64,
        high: f64,
        seed: Option<u64>,
    },
}

impl Default for InitSpec {
    fn default() -> Self {
        InitSpec::Const(DEFAULT_WEIGHT)
    }
}

impl InitSpec {
    pub fn build(self) -> Result<Arc<dyn ParamGen>> {
        Ok(match self {
            InitSpec::Const(value) => Arc::new(ConstParamGen::new(value)),
            InitSpec::Uniform { low, high, seed } => {
                Arc::new(RandParamGen::uniform(seed, low, high)?)
            }
        })
    }
}

/// Everything needed to set up training, as read from a JSON file.
///
/// Every field is optional:
/// ```json
/// {
///   "eta": 0.5,
///   "policy": "adagrad",
///   "fixed_weights": ["id(*"],
///   "init": { "uniform": { "low": 0.9, "high": 1.1, "seed": 7 } },
///   "workers": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    pub eta: f64,
    pub min_gradient: f64,
    pub policy: PolicySpec,
    pub fixed_weights: Vec<String>,
    pub init: InitSpec,
    pub shards: NonZeroUsize,
    pub workers: Option<NonZeroUsize>,
    pub status_interval_secs: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            eta: DEFAULT_ETA,
            min_gradient: MIN_GRADIENT,
            policy: PolicySpec::default(),
            fixed_weights: Vec::new(),
            init: InitSpec::default(),
            // SAFETY: `DEFAULT_SHARDS` is a non zero constant.
            shards: NonZeroUsize::new(DEFAULT_SHARDS).unwrap(),
            workers: None,
            status_interval_secs: DEFAULT_STATUS_INTERVAL_SECS,
        }
    }
}

impl TrainerConfig {
    /// Reads and validates a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants serde can't express.
    pub fn validate(&self) -> Result<()> {
        if !self.eta.is_finite() || self.eta <= 0. {
            return Err(ConfigErr::Invalid(format!(
                "eta must be finite and positive, got {}",
                self.eta
            )));
        }

        if self.min_gradient.is_nan() || self.min_gradient < 0. {
            return Err(ConfigErr::Invalid(format!(
                "min_gradient must be non negative, got {}",
                self.min_gradient
            )));
        }

        Ok(())
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            eta: self.eta,
            min_gradient: self.min_gradient,
        }
    }

    pub fn fixed_weight_rules(&self) -> FixedWeightRules {
        FixedWeightRules::new(self.fixed_weights.iter().cloned())
    }

    /// The configured amount of workers, or the available parallelism.
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
            .or_else(|| thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN)
    }
}
