mod learning_rate;
mod report;
mod state;
mod stepper;

pub use learning_rate::{AdaGrad, FixedRate, LearningRate};
pub use report::StepReport;
pub use state::{DEFAULT_ETA, OptimizerConfig, OptimizerState};
pub use stepper::{MIN_GRADIENT, apply};
