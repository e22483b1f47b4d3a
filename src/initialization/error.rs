use std::{
    error::Error,
    fmt::{self, Display},
};

use rand::distr::uniform::Error as UniformError;

/// The specific result type for the different `ParamGen` constructors.
pub type Result<T> = std::result::Result<T, InitErr>;

/// Error returned by the `RandParamGen` constructors whenever the requested
/// distribution can't be built.
#[derive(Debug)]
pub struct InitErr(String);

impl From<UniformError> for InitErr {
    fn from(value: UniformError) -> Self {
        Self(value.to_string())
    }
}

impl Display for InitErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid initial weight distribution: {}", self.0)
    }
}

impl Error for InitErr {}
