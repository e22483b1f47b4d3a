mod collaborators;
mod error;
mod fixed;
mod parallel;
mod status;
mod trainer;

pub use collaborators::{FeatureGraph, NoRegularizer, PosNegExample, Regularizer, SrwModel};
pub use error::{Result, TrainErr};
pub use fixed::FixedWeightRules;
pub use parallel::train_parallel;
pub use status::StatusLogger;
pub use trainer::{DEFAULT_STATUS_INTERVAL_SECS, Trainer};
