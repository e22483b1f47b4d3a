use std::{error::Error, fmt};

use rayon::ThreadPoolBuildError;

/// The training module's result type.
pub type Result<T> = std::result::Result<T, TrainErr>;

/// Training failures.
#[derive(Debug)]
pub enum TrainErr {
    /// A gradient referenced a feature id the example's graph can't resolve.
    UnknownFeature { id: usize, example: String },
    /// The worker pool couldn't be started.
    ThreadPool(ThreadPoolBuildError),
}

impl fmt::Display for TrainErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainErr::UnknownFeature { id, example } => {
                write!(f, "unknown feature id {id} in gradient of {example}")
            }
            TrainErr::ThreadPool(e) => write!(f, "cannot start training workers: {e}"),
        }
    }
}

impl Error for TrainErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainErr::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ThreadPoolBuildError> for TrainErr {
    fn from(value: ThreadPoolBuildError) -> Self {
        Self::ThreadPool(value)
    }
}
